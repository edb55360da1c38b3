//! Concurrent, priority-arbitrated game automation engine.
//!
//! A session observes the game through a [`SnapshotProvider`](game_core::SnapshotProvider)
//! and drives it through simulated input, running four loops per game that
//! share one snapshot and take turns through the [`Arbitrator`].
//!
//! Modules are organized by layer:
//! - [`priority`], [`session`] and [`context`] hold the shared state every
//!   task reaches through an explicit [`Context`]
//! - [`movement`] and [`attack`] are the controllers that issue input
//! - [`steps`] composes them into retrying, fallback-aware helpers
//! - [`orchestrator`] runs the loops and the game lifecycle
//! - [`events`] publishes diagnostic events on a topic-based bus
pub mod api;
pub mod attack;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod movement;
pub mod orchestrator;
pub mod priority;
pub mod session;
pub mod steps;

pub use api::{GameRoutines, NoopRoutines, Run};
pub use attack::{AttackOptions, AttackOutcome, AttackTarget, SkillSlot};
pub use config::BotConfig;
pub use context::Context;
pub use error::{BotError, Result};
pub use events::{Event, EventBus, Topic};
pub use movement::{MoveError, MoveOptions, MoveOutcome, MonsterFilter, move_to};
pub use orchestrator::{Bot, Supervisor, SupervisorReport};
pub use priority::{Arbitrator, Priority};
pub use session::{Session, SessionBuilder};
