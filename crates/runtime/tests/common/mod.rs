#![allow(dead_code)]

use std::sync::Arc;

use bot_runtime::{BotConfig, Context, Priority, Session};
use game_sim::SimWorld;

/// Session over `world` with every collaborator backed by the sim.
pub fn session(world: &Arc<SimWorld>, config: BotConfig) -> Arc<Session> {
    Session::builder(world.clone(), world.clone(), world.clone())
        .name("test")
        .packets(world.clone())
        .config(config)
        .build()
}

pub fn context(session: &Arc<Session>, priority: Priority) -> Context {
    Context::new(Arc::clone(session), priority, session.root_token().child_token())
}

pub fn quiet_config() -> BotConfig {
    let mut config = BotConfig::default();
    config.character.use_teleport = false;
    config
}
