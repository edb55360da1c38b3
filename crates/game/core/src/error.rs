//! Shared error classification.
//!
//! Every error surfaced by the collaborators and by the runtime carries an
//! [`ErrorSeverity`], which is the only input the orchestrator uses when it
//! decides between ending a session and moving on to the next unit of work.

/// How far up the stack an error is allowed to travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Ends the whole session (death, chicken, stop request, lost game data).
    Critical,

    /// The calling layer retries, repositions, or abandons the sub-goal while
    /// the broader run continues.
    ///
    /// Examples: movement stuck, monsters in path, item too far
    Recoverable,
}

impl ErrorSeverity {
    pub const fn is_critical(self) -> bool {
        matches!(self, Self::Critical)
    }
}

/// Common interface for error classification.
pub trait Classified: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the error variant, used in structured logs.
    fn error_code(&self) -> &'static str;
}
