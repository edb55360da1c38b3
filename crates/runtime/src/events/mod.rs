//! Topic-based event bus for engine events.
//!
//! Events are a diagnostic side channel: the engine publishes game, run,
//! pickup and combat decisions and never waits for consumers.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CombatEvent, ItemEvent, RunEvent, RunOutcome, SessionEvent};
