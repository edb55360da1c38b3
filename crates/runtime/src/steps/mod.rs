//! Step and action layer.
//!
//! Small composable helpers built on the controllers: bounded waiting,
//! retries with ordered fallback strategies, object interaction, item pickup,
//! buffs, weapon swaps, area clearing and resilient travel. Helpers return
//! typed errors and leave the decision to abort the game to the orchestrator.
pub mod buff;
pub mod clear;
pub mod interact;
pub mod pickup;
pub mod retry;
pub mod strategy;
pub mod travel;
pub mod wait;
pub mod weapon;

use std::time::Duration;

pub use buff::{buff, buff_if_required};
pub use clear::{ClearReport, clear_area};
pub use interact::{interact_object, open_container};
pub use pickup::{PickupOutcome, pick_up_item, pick_up_nearby};
pub use retry::RetryPolicy;
pub use strategy::{Strategy, StrategyChain};
pub use travel::move_to_resilient;
pub use wait::wait_until;
pub use weapon::{swap_to_other, swap_weapon};

/// Upper bound on waiting for priority in helpers that may be called from a
/// preempting task.
pub const PRIORITY_WAIT: Duration = Duration::from_secs(2);
