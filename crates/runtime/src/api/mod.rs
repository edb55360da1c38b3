//! Public runtime API surface.
//!
//! Traits implemented by the host application: the [`Run`]s a game executes
//! and the [`GameRoutines`] the engine delegates menu and town work to.

pub mod routines;
pub mod run;

pub use routines::{GameRoutines, NoopRoutines};
pub use run::Run;
