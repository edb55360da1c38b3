//! Ordered fallback between interaction strategies.
use async_trait::async_trait;
use tracing::debug;

use crate::context::Context;
use crate::error::Result;

/// One way of achieving an interaction, e.g. a packet request or a mouse
/// click.
///
/// `attempt` only issues the request; callers confirm the effect by polling
/// snapshots afterwards.
#[async_trait]
pub trait Strategy<T: Sync + ?Sized>: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the strategy can be tried at all for `target`.
    fn applicable(&self, _ctx: &Context, _target: &T) -> bool {
        true
    }

    async fn attempt(&self, ctx: &Context, target: &T) -> Result<()>;
}

/// Strategies tried in order until one issues its request.
pub struct StrategyChain<T: Sync + ?Sized> {
    strategies: Vec<Box<dyn Strategy<T>>>,
}

impl<T: Sync + ?Sized> StrategyChain<T> {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    pub fn with(mut self, strategy: impl Strategy<T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run the first applicable strategy that succeeds and return its name.
    ///
    /// Recoverable failures move on to the next strategy; critical ones
    /// propagate immediately. `None` means nothing could be issued.
    pub async fn run(&self, ctx: &Context, target: &T) -> Result<Option<&'static str>> {
        for strategy in &self.strategies {
            if !strategy.applicable(ctx, target) {
                continue;
            }
            match strategy.attempt(ctx, target).await {
                Ok(()) => return Ok(Some(strategy.name())),
                Err(e) if e.is_critical() => return Err(e),
                Err(e) => debug!(strategy = strategy.name(), error = %e, "strategy failed"),
            }
        }
        Ok(None)
    }
}

impl<T: Sync + ?Sized> Default for StrategyChain<T> {
    fn default() -> Self {
        Self::new()
    }
}
