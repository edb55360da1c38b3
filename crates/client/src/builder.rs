//! Client builder with dependency injection pattern.
use std::sync::Arc;

use anyhow::{Context, Result};
use bot_runtime::{Run, Session, Supervisor};
use game_sim::SimWorld;

use crate::Client;
use crate::config::ClientConfig;
use crate::routines::SimRoutines;

/// Builder for constructing a [`Client`] with proper validation.
#[derive(Default)]
pub struct ClientBuilder {
    config: Option<ClientConfig>,
    world: Option<Arc<SimWorld>>,
    runs: Vec<Arc<dyn Run>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration (required).
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the world the session observes and drives (required).
    pub fn world(mut self, world: Arc<SimWorld>) -> Self {
        self.world = Some(world);
        self
    }

    /// Append runs executed every game, in order.
    pub fn runs(mut self, runs: impl IntoIterator<Item = Arc<dyn Run>>) -> Self {
        self.runs.extend(runs);
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or world is missing, or if no run
    /// was registered.
    pub fn build(self) -> Result<Client> {
        let config = self
            .config
            .context("Config is required. Use .config() to set it.")?;
        let world = self
            .world
            .context("World is required. Use .world() to set it.")?;
        anyhow::ensure!(!self.runs.is_empty(), "At least one run is required. Use .runs() to add them.");

        let mut session = Session::builder(world.clone(), world.clone(), world.clone())
            .config(config.bot)
            .routines(Arc::new(SimRoutines::new(world.clone())));
        if let Some(id) = config.session_id {
            session = session.name(id);
        }
        session = session.packets(world);

        Ok(Client {
            supervisor: Arc::new(Supervisor::new(session.build(), self.runs)),
            max_games: config.max_games,
        })
    }
}
