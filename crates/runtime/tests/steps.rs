mod common;

use std::sync::Arc;
use std::time::Duration;

use bot_runtime::config::BuffSkill;
use bot_runtime::events::ItemEvent;
use bot_runtime::steps::{
    PickupOutcome, buff_if_required, move_to_resilient, open_container, pick_up_item,
    swap_to_other, swap_weapon, wait_until,
};
use bot_runtime::{BotError, Event, MoveOptions, Priority, Topic};
use game_core::{Key, PlayerStates, Position, SkillId, UnitId, WeaponSet};
use game_sim::{InputAction, PacketRequest, SimWorld, units};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_open_container_on_open_chest_issues_no_input() {
    let world = Arc::new(
        SimWorld::builder(20, 20)
            .player_at(Position::new(2, 2))
            .object(units::chest(9, Position::new(3, 2)))
            .build(),
    );
    world.update(|s| s.objects[0].selectable = false);
    let session = common::session(&world, common::quiet_config());
    let ctx = common::context(&session, Priority::Normal);

    let started = Instant::now();
    open_container(&ctx, UnitId(9)).await.unwrap();

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(world.actions().is_empty());

    open_container(&ctx, UnitId(404)).await.unwrap();
    assert!(world.actions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_open_container_walks_and_opens_once() {
    let world = Arc::new(
        SimWorld::builder(30, 10)
            .player_at(Position::new(1, 5))
            .object(units::chest(9, Position::new(15, 5)))
            .build(),
    );
    let session = common::session(&world, common::quiet_config());
    let ctx = common::context(&session, Priority::Normal);

    open_container(&ctx, UnitId(9)).await.unwrap();
    assert!(!world.snapshot().object(UnitId(9)).unwrap().selectable);

    world.clear_actions();
    open_container(&ctx, UnitId(9)).await.unwrap();
    assert!(world.actions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_packet_interaction_is_tried_first() {
    let world = Arc::new(
        SimWorld::builder(10, 10)
            .object(units::chest(9, Position::new(2, 2)))
            .build(),
    );
    let mut config = common::quiet_config();
    config.use_packets = true;
    let session = common::session(&world, config);
    let ctx = common::context(&session, Priority::Normal);

    open_container(&ctx, UnitId(9)).await.unwrap();

    assert_eq!(
        world.actions(),
        vec![InputAction::Packet(PacketRequest::Interact(UnitId(9)))]
    );
}

#[tokio::test(start_paused = true)]
async fn test_rejected_packet_falls_back_to_click() {
    let world = Arc::new(
        SimWorld::builder(10, 10)
            .object(units::chest(9, Position::new(2, 2)))
            .build(),
    );
    world.reject_packets(true);
    let mut config = common::quiet_config();
    config.use_packets = true;
    let session = common::session(&world, config);
    let ctx = common::context(&session, Priority::Normal);

    open_container(&ctx, UnitId(9)).await.unwrap();

    assert!(!world.snapshot().object(UnitId(9)).unwrap().selectable);
    assert!(
        world
            .actions()
            .iter()
            .any(|a| matches!(a, InputAction::Click { .. }))
    );
}

#[tokio::test(start_paused = true)]
async fn test_unpickable_item_is_blacklisted_once() {
    let world = Arc::new(
        SimWorld::builder(20, 20)
            .player_at(Position::new(5, 5))
            .item(units::item(77, "cursed ring", Position::new(6, 5)))
            .build(),
    );
    world.make_sticky(UnitId(77));
    let session = common::session(&world, common::quiet_config());
    let ctx = common::context(&session, Priority::Normal);
    let mut items = session.events().subscribe(Topic::Item);

    let outcome = pick_up_item(&ctx, UnitId(77)).await.unwrap();
    assert_eq!(outcome, PickupOutcome::Blacklisted);

    match items.try_recv() {
        Ok(Event::Item(ItemEvent::Blacklisted {
            item,
            name,
            attempts,
            snapshot,
        })) => {
            assert_eq!(item, UnitId(77));
            assert_eq!(name, "cursed ring");
            assert_eq!(attempts, 5);
            assert!(snapshot.ground_item(UnitId(77)).is_some());
        }
        other => panic!("expected a blacklist event, got {other:?}"),
    }

    world.clear_actions();
    let again = pick_up_item(&ctx, UnitId(77)).await.unwrap();
    assert_eq!(again, PickupOutcome::Blacklisted);
    assert!(world.actions().is_empty());
    assert!(matches!(items.try_recv(), Err(TryRecvError::Empty)));
    assert!(ctx.game(|g| g.is_blacklisted(UnitId(77))));
}

#[tokio::test(start_paused = true)]
async fn test_pickup_records_the_item() {
    let world = Arc::new(
        SimWorld::builder(20, 20)
            .player_at(Position::new(5, 5))
            .item(units::item(78, "ring", Position::new(12, 5)))
            .build(),
    );
    let session = common::session(&world, common::quiet_config());
    let ctx = common::context(&session, Priority::Normal);
    let mut items = session.events().subscribe(Topic::Item);

    let outcome = pick_up_item(&ctx, UnitId(78)).await.unwrap();

    assert_eq!(outcome, PickupOutcome::PickedUp);
    assert!(world.snapshot().inventory.contains(UnitId(78)));
    assert!(ctx.game(|g| g.picked_up(UnitId(78)).is_some()));
    assert!(matches!(
        items.try_recv(),
        Ok(Event::Item(ItemEvent::PickedUp { item: UnitId(78), .. }))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_pickup_disabled_and_gone() {
    let world = Arc::new(SimWorld::builder(20, 20).build());
    let session = common::session(&world, common::quiet_config());
    let ctx = common::context(&session, Priority::Normal);

    assert_eq!(pick_up_item(&ctx, UnitId(5)).await.unwrap(), PickupOutcome::Gone);

    ctx.game(|g| g.pickup_items = false);
    assert_eq!(pick_up_item(&ctx, UnitId(5)).await.unwrap(), PickupOutcome::Disabled);
}

#[tokio::test(start_paused = true)]
async fn test_buffs_cast_when_state_missing() {
    let world = Arc::new(
        SimWorld::builder(10, 10)
            .bind_skill(SkillId::BATTLE_ORDERS, Key::F(6))
            .build(),
    );
    let mut config = common::quiet_config();
    config.character.buffs = vec![BuffSkill {
        skill: SkillId::BATTLE_ORDERS,
        grants: PlayerStates::BATTLE_ORDERS,
    }];
    let session = common::session(&world, config);
    let ctx = common::context(&session, Priority::Normal);

    assert!(buff_if_required(&ctx).await.unwrap());
    assert!(world.snapshot().player.has_state(PlayerStates::BATTLE_ORDERS));

    world.clear_actions();
    assert!(!buff_if_required(&ctx).await.unwrap());
    assert!(world.actions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_lost_buff_is_recast_only_after_the_retry_delay() {
    let world = Arc::new(
        SimWorld::builder(10, 10)
            .bind_skill(SkillId::BATTLE_ORDERS, Key::F(6))
            .build(),
    );
    let mut config = common::quiet_config();
    config.character.buff_retry = Duration::from_secs(2);
    config.character.buffs = vec![BuffSkill {
        skill: SkillId::BATTLE_ORDERS,
        grants: PlayerStates::BATTLE_ORDERS,
    }];
    let session = common::session(&world, config);
    let ctx = common::context(&session, Priority::Normal);

    assert!(buff_if_required(&ctx).await.unwrap());
    world.update(|s| s.player.states.remove(PlayerStates::BATTLE_ORDERS));

    assert!(!buff_if_required(&ctx).await.unwrap());
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(buff_if_required(&ctx).await.unwrap());
    assert!(world.snapshot().player.has_state(PlayerStates::BATTLE_ORDERS));
}

#[tokio::test(start_paused = true)]
async fn test_weapon_swap_is_verified() {
    let world = Arc::new(SimWorld::builder(10, 10).build());
    let session = common::session(&world, common::quiet_config());
    let ctx = common::context(&session, Priority::Normal);

    swap_to_other(&ctx).await.unwrap();
    assert_eq!(world.snapshot().player.weapon_set, WeaponSet::Swap);

    world.set_unresponsive(true);
    let result = swap_weapon(&ctx, WeaponSet::Main).await;
    assert!(matches!(
        result,
        Err(BotError::WeaponSwapTimeout {
            expected: WeaponSet::Main
        })
    ));
    let swaps = world
        .actions()
        .into_iter()
        .filter(|a| *a == InputAction::Key(Key::Char('w')))
        .count();
    assert_eq!(swaps, 1 + 3);
}

#[tokio::test(start_paused = true)]
async fn test_wait_until_times_out() {
    let world = Arc::new(SimWorld::builder(10, 10).build());
    let session = common::session(&world, common::quiet_config());
    let ctx = common::context(&session, Priority::Normal);

    let started = Instant::now();
    let met = wait_until(&ctx, Duration::from_millis(300), |s| s.player.is_dead).await.unwrap();

    assert!(!met);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(300) && elapsed < Duration::from_millis(310));
    assert!(wait_until(&ctx, Duration::ZERO, |s| !s.player.is_dead).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_resilient_travel_clears_blocking_monsters() {
    let world = Arc::new(
        SimWorld::builder(40, 10)
            .player_at(Position::new(1, 5))
            .monster(units::monster(3, Position::new(5, 5), 50))
            .item(units::item(90, "gem", Position::new(29, 5)))
            .build(),
    );
    let mut config = common::quiet_config();
    config.movement.clear_path_distance = 6;
    let session = common::session(&world, config);
    let ctx = common::context(&session, Priority::Normal);

    move_to_resilient(&ctx, Position::new(30, 5), &MoveOptions::default())
        .await
        .unwrap();

    let snapshot = world.snapshot();
    assert!(!snapshot.monster(UnitId(3)).unwrap().is_alive());
    assert!(snapshot.inventory.contains(UnitId(90)));
}

#[tokio::test(start_paused = true)]
async fn test_stop_unwinds_a_step() {
    let world = Arc::new(SimWorld::builder(10, 10).build());
    let session = common::session(&world, common::quiet_config());
    let ctx = common::context(&session, Priority::Normal);

    let waiting = tokio::spawn({
        let ctx = ctx.clone();
        async move { wait_until(&ctx, Duration::from_secs(60), |s| s.player.is_dead).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.stop();

    let result = waiting.await.unwrap();
    assert!(matches!(result, Err(BotError::Stopped)));
}
