//! Composition root of the bot: a session over the simulated world, the
//! bundled runs and the supervisor playing games until told to stop.
mod builder;
pub mod config;
pub mod logging;
pub mod routines;
pub mod runs;
pub mod world;

pub use builder::ClientBuilder;
pub use config::ClientConfig;

use std::sync::Arc;

use anyhow::Result;
use bot_runtime::{Event, EventBus, Supervisor, SupervisorReport, Topic};
use tokio::task::JoinHandle;

/// Top-level client container.
pub struct Client {
    supervisor: Arc<Supervisor>,
    max_games: Option<u32>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn supervisor(&self) -> &Arc<Supervisor> {
        &self.supervisor
    }

    /// Play games until the limit is reached, a critical error ends the
    /// session, or Ctrl-C requests a stop.
    pub async fn run(self) -> Result<SupervisorReport> {
        let events = spawn_event_logger(self.supervisor.session().events());
        let interrupt = spawn_interrupt_handler(Arc::clone(&self.supervisor));

        let result = self.supervisor.run(self.max_games).await;
        interrupt.abort();
        events.abort();

        Ok(result?)
    }
}

/// Request a stop on the first Ctrl-C.
fn spawn_interrupt_handler(supervisor: Arc<Supervisor>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Ctrl-C received, stopping");
                supervisor.stop();
            }
            Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {}", e),
        }
    })
}

/// Mirror lifecycle and run events into the log.
fn spawn_event_logger(bus: &EventBus) -> JoinHandle<()> {
    let mut sessions = bus.subscribe(Topic::Session);
    let mut runs = bus.subscribe(Topic::Run);
    let mut items = bus.subscribe(Topic::Item);
    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                Ok(event) = sessions.recv() => event,
                Ok(event) = runs.recv() => event,
                Ok(event) = items.recv() => event,
                else => break,
            };
            log_event(&event);
        }
    })
}

fn log_event(event: &Event) {
    match event {
        Event::Session(e) => tracing::info!(event = ?e, "session"),
        Event::Run(e) => tracing::info!(event = ?e, "run"),
        Event::Item(e) => tracing::debug!(event = ?e, "item"),
        Event::Combat(e) => tracing::debug!(event = ?e, "combat"),
    }
}
