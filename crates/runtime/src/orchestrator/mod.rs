//! Session orchestration.
//!
//! A game runs four concurrent loops: background refresh, health monitoring,
//! high-priority housekeeping and the low-priority run executor. The
//! [`Supervisor`] repeats games and owns pause, resume and stop.
mod bot;
mod health;
mod housekeeping;
mod loops;
mod supervisor;

pub use bot::Bot;
pub use supervisor::{Supervisor, SupervisorReport};
