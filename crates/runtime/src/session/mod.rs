//! Shared state of one bot session.
//!
//! A [`Session`] owns everything the concurrent loops share: the latest
//! snapshot, the priority arbitrator, the per-game record, the attack state
//! table and the external collaborators. It is always handled through an
//! `Arc` and reached from tasks via [`Context`](crate::context::Context).
mod game;
mod snapshot;

pub use game::CurrentGame;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use game_core::{InputDevice, PacketSender, Pathfinder, Snapshot, SnapshotProvider};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api::{GameRoutines, NoopRoutines};
use crate::attack::AttackController;
use crate::config::BotConfig;
use crate::error::Result;
use crate::events::{Event, EventBus, SessionEvent};
use crate::priority::{Arbitrator, Priority};

use snapshot::SnapshotCell;

/// Last action and step recorded by the task running at one priority tier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DebugMarker {
    pub action: Option<String>,
    pub step: Option<String>,
}

/// External collaborators the engine observes and drives the game through.
#[derive(Clone)]
pub struct Collaborators {
    pub provider: Arc<dyn SnapshotProvider>,
    pub input: Arc<dyn InputDevice>,
    pub pathfinder: Arc<dyn Pathfinder>,
    pub packets: Option<Arc<dyn PacketSender>>,
    pub routines: Arc<dyn GameRoutines>,
}

pub struct Session {
    name: String,
    config: Arc<BotConfig>,
    snapshot: SnapshotCell,
    arbitrator: Arbitrator,
    game: Mutex<CurrentGame>,
    markers: Mutex<HashMap<Priority, DebugMarker>>,
    env: Collaborators,
    events: EventBus,
    attack: AttackController,
    /// Session-wide scope; each game runs under a child token.
    root: CancellationToken,
}

impl Session {
    pub fn builder(
        provider: Arc<dyn SnapshotProvider>,
        input: Arc<dyn InputDevice>,
        pathfinder: Arc<dyn Pathfinder>,
    ) -> SessionBuilder {
        SessionBuilder::new(provider, input, pathfinder)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn arbitrator(&self) -> &Arbitrator {
        &self.arbitrator
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn env(&self) -> &Collaborators {
        &self.env
    }

    pub(crate) fn attack(&self) -> &AttackController {
        &self.attack
    }

    /// Targets the attack controller currently tracks stall state for.
    pub fn attack_targets(&self) -> usize {
        self.attack.tracked()
    }

    pub fn root_token(&self) -> &CancellationToken {
        &self.root
    }

    /// Most recent snapshot without touching the provider.
    pub fn latest(&self) -> Arc<Snapshot> {
        self.snapshot.latest()
    }

    /// Rate-limited snapshot refresh shared by every loop.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        self.snapshot
            .refresh(self.env.provider.as_ref(), self.config.session.refresh_interval)
            .await
    }

    /// Refresh ignoring the rate limit.
    pub async fn force_refresh(&self) -> Result<Arc<Snapshot>> {
        self.snapshot.invalidate();
        self.refresh().await
    }

    /// Run `f` with exclusive access to the current game record.
    ///
    /// The lock is synchronous; never hold it across an await point.
    pub fn with_game<R>(&self, f: impl FnOnce(&mut CurrentGame) -> R) -> R {
        f(&mut lock(&self.game))
    }

    pub fn set_marker(&self, tier: Priority, update: impl FnOnce(&mut DebugMarker)) {
        update(lock(&self.markers).entry(tier).or_default());
    }

    pub fn marker(&self, tier: Priority) -> DebugMarker {
        lock(&self.markers).get(&tier).cloned().unwrap_or_default()
    }

    /// Reset per-game state before a new game starts.
    pub fn reset_game(&self) {
        *lock(&self.game) = CurrentGame::new(self.config.pickup.enabled);
        lock(&self.markers).clear();
        self.attack.clear();
        self.snapshot.invalidate();
        if !matches!(self.arbitrator.active(), Priority::Pause | Priority::Stop) {
            self.arbitrator.switch(Priority::Normal);
        }
        tracing::debug!(session = %self.name, "game state reset");
    }

    pub fn pause(&self) {
        self.arbitrator.pause();
        self.env.input.release_all();
        self.events.publish(Event::Session(SessionEvent::Paused));
        tracing::info!(session = %self.name, "session paused");
    }

    pub fn resume(&self) {
        self.arbitrator.resume();
        self.events.publish(Event::Session(SessionEvent::Resumed));
        tracing::info!(session = %self.name, "session resumed");
    }

    /// Stop every loop of every game. Terminal.
    pub fn stop(&self) {
        self.arbitrator.switch(Priority::Stop);
        self.root.cancel();
        self.events.publish(Event::Session(SessionEvent::Stopped));
        tracing::info!(session = %self.name, "session stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.arbitrator.is_stopped() || self.root.is_cancelled()
    }

    /// Time since the current game record was created.
    pub fn game_elapsed(&self) -> std::time::Duration {
        let started = self.with_game(|g| g.started_at);
        Instant::now().saturating_duration_since(started)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.name)
            .field("active", &self.arbitrator.active())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builder for [`Session`].
pub struct SessionBuilder {
    name: String,
    config: BotConfig,
    provider: Arc<dyn SnapshotProvider>,
    input: Arc<dyn InputDevice>,
    pathfinder: Arc<dyn Pathfinder>,
    packets: Option<Arc<dyn PacketSender>>,
    routines: Arc<dyn GameRoutines>,
    events: Option<EventBus>,
}

impl SessionBuilder {
    fn new(
        provider: Arc<dyn SnapshotProvider>,
        input: Arc<dyn InputDevice>,
        pathfinder: Arc<dyn Pathfinder>,
    ) -> Self {
        Self {
            name: "default".to_owned(),
            config: BotConfig::default(),
            provider,
            input,
            pathfinder,
            packets: None,
            routines: Arc::new(NoopRoutines),
            events: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn config(mut self, config: BotConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a packet transport. It is only used when `use_packets` is set.
    pub fn packets(mut self, packets: Arc<dyn PacketSender>) -> Self {
        self.packets = Some(packets);
        self
    }

    pub fn routines(mut self, routines: Arc<dyn GameRoutines>) -> Self {
        self.routines = routines;
        self
    }

    /// Share an existing bus instead of creating a new one.
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> Arc<Session> {
        let attack = AttackController::new(self.config.attack.clone());
        Arc::new(Session {
            game: Mutex::new(CurrentGame::new(self.config.pickup.enabled)),
            name: self.name,
            config: Arc::new(self.config),
            snapshot: SnapshotCell::new(),
            arbitrator: Arbitrator::new(),
            markers: Mutex::new(HashMap::new()),
            env: Collaborators {
                provider: self.provider,
                input: self.input,
                pathfinder: self.pathfinder,
                packets: self.packets,
                routines: self.routines,
            },
            events: self.events.unwrap_or_default(),
            attack,
            root: CancellationToken::new(),
        })
    }
}
