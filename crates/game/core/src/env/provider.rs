use super::error::EnvError;
use crate::state::Snapshot;

/// Source of complete game observations (the memory reader).
pub trait SnapshotProvider: Send + Sync {
    /// Read a complete, self-consistent observation of the game at call time.
    fn fetch(&self) -> Result<Snapshot, EnvError>;
}
