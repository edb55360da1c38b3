//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{CombatEvent, ItemEvent, RunEvent, SessionEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::EnumIter)]
pub enum Topic {
    /// Game lifecycle (start, finish, pause, stop)
    Session,
    /// Run lifecycle inside a game
    Run,
    /// Ground item pickups and blacklisting
    Item,
    /// Repositions and abandoned targets
    Combat,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Session(SessionEvent),
    Run(RunEvent),
    Item(ItemEvent),
    Combat(CombatEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Session(_) => Topic::Session,
            Event::Run(_) => Topic::Run,
            Event::Item(_) => Topic::Item,
            Event::Combat(_) => Topic::Combat,
        }
    }
}

struct Channels {
    session: broadcast::Sender<Event>,
    run: broadcast::Sender<Event>,
    item: broadcast::Sender<Event>,
    combat: broadcast::Sender<Event>,
}

impl Channels {
    fn get(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Session => &self.session,
            Topic::Run => &self.run,
            Topic::Item => &self.item,
            Topic::Combat => &self.combat,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks the engine.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Channels {
                session: broadcast::channel(capacity).0,
                run: broadcast::channel(capacity).0,
                item: broadcast::channel(capacity).0,
                combat: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.get(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.get(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RunOutcome;
    use strum::IntoEnumIterator;

    #[tokio::test]
    async fn test_subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut runs = bus.subscribe(Topic::Run);
        let mut sessions = bus.subscribe(Topic::Session);

        bus.publish(Event::Run(RunEvent::RunStarted {
            name: "pit".into(),
        }));

        assert!(matches!(
            runs.recv().await.unwrap(),
            Event::Run(RunEvent::RunStarted { .. })
        ));
        assert!(sessions.try_recv().is_err());
    }

    #[test]
    fn test_publishing_without_subscribers_is_silent() {
        let bus = EventBus::new();
        for topic in Topic::iter() {
            let event = match topic {
                Topic::Session => Event::Session(SessionEvent::Paused),
                Topic::Run => Event::Run(RunEvent::RunStarted { name: "x".into() }),
                Topic::Item => Event::Item(ItemEvent::PickedUp {
                    item: game_core::UnitId(1),
                    name: "ring".into(),
                }),
                Topic::Combat => Event::Combat(CombatEvent::Repositioned {
                    target: game_core::UnitId(1),
                    attempt: 1,
                }),
            };
            assert_eq!(event.topic(), topic);
            bus.publish(event);
        }
    }

    #[test]
    fn test_events_serialize_for_external_consumers() {
        let event = Event::Run(RunEvent::RunFinished {
            name: "pit".into(),
            outcome: RunOutcome::Failed {
                error: "player died".into(),
                code: "PLAYER_DIED".into(),
            },
            duration_ms: 1200,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["Run"]["RunFinished"]["outcome"]["Failed"]["code"], "PLAYER_DIED");
        assert_eq!(json["Run"]["RunFinished"]["duration_ms"], 1200);
    }
}
