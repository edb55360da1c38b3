mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bot_runtime::{BotError, Priority};
use game_sim::SimWorld;
use tokio::time::Instant;

const WORKERS: [Priority; 3] = [Priority::High, Priority::Normal, Priority::Background];

#[tokio::test(start_paused = true)]
async fn test_at_most_one_tier_holds_priority() {
    let world = Arc::new(SimWorld::builder(10, 10).build());
    let session = common::session(&world, common::quiet_config());
    let holders = Arc::new(AtomicUsize::new(0));
    let entries = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::new();
    for tier in WORKERS {
        let ctx = common::context(&session, tier);
        let holders = Arc::clone(&holders);
        let entries = Arc::clone(&entries);
        tasks.push(tokio::spawn(async move {
            loop {
                if ctx.pause_if_not_priority().await.is_err() {
                    return;
                }
                assert_eq!(ctx.session().arbitrator().active(), tier);
                let inside = holders.fetch_add(1, Ordering::SeqCst) + 1;
                assert_eq!(inside, 1, "{tier} shares priority");
                entries.fetch_add(1, Ordering::SeqCst);
                holders.fetch_sub(1, Ordering::SeqCst);
                if ctx.sleep(Duration::from_millis(3)).await.is_err() {
                    return;
                }
            }
        }));
    }

    let arbitrator = session.arbitrator();
    for round in 0..60 {
        let tier = WORKERS[round % WORKERS.len()];
        arbitrator.switch(tier);
        for _ in 0..5 {
            tokio::time::sleep(Duration::from_millis(1)).await;
            let observing = WORKERS.iter().filter(|t| **t == arbitrator.active()).count();
            assert_eq!(observing, 1);
        }
    }
    session.stop();

    for task in tasks {
        task.await.unwrap();
    }
    assert!(entries.load(Ordering::SeqCst) > 0);
}

#[tokio::test(start_paused = true)]
async fn test_bounded_wait_returns_false_after_timeout() {
    let world = Arc::new(SimWorld::builder(10, 10).build());
    let session = common::session(&world, common::quiet_config());
    session.arbitrator().switch(Priority::High);
    let ctx = common::context(&session, Priority::Normal);

    let started = Instant::now();
    let granted = ctx
        .pause_if_not_priority_timeout(Duration::from_millis(200))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert!(!granted);
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(210));
}

#[tokio::test(start_paused = true)]
async fn test_pause_blocks_until_resume() {
    let world = Arc::new(SimWorld::builder(10, 10).build());
    let session = common::session(&world, common::quiet_config());
    let ctx = common::context(&session, Priority::Normal);

    session.pause();
    assert_eq!(session.arbitrator().active(), Priority::Pause);
    let waiting = tokio::spawn({
        let ctx = ctx.clone();
        async move {
            ctx.pause_if_not_priority().await?;
            Ok::<_, BotError>(Instant::now())
        }
    });

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!waiting.is_finished());
    let resumed_at = Instant::now();
    session.resume();

    let granted_at = waiting.await.unwrap().unwrap();
    assert!(granted_at >= resumed_at);
    assert_eq!(session.arbitrator().active(), Priority::Normal);
    assert!(
        world
            .actions()
            .contains(&game_sim::InputAction::ReleaseAll)
    );
}

#[tokio::test(start_paused = true)]
async fn test_stop_releases_every_waiter() {
    let world = Arc::new(SimWorld::builder(10, 10).build());
    let session = common::session(&world, common::quiet_config());
    session.arbitrator().switch(Priority::High);

    let waiters: Vec<_> = [Priority::Normal, Priority::Background]
        .into_iter()
        .map(|tier| {
            let ctx = common::context(&session, tier);
            tokio::spawn(async move { ctx.pause_if_not_priority().await })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(10)).await;
    session.stop();
    assert!(session.is_stopped());

    for waiter in waiters {
        assert!(matches!(waiter.await.unwrap(), Err(BotError::Stopped)));
    }
    session.arbitrator().switch(Priority::Normal);
    assert_eq!(session.arbitrator().active(), Priority::Stop);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_refreshes_fetch_once() {
    let world = Arc::new(SimWorld::builder(10, 10).build());
    let session = common::session(&world, common::quiet_config());
    let background = common::context(&session, Priority::Background);
    let health = common::context(&session, Priority::Background);

    let (a, b) = tokio::join!(background.refresh(), health.refresh());
    assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    assert_eq!(world.fetch_count(), 1);

    tokio::time::sleep(session.config().session.refresh_interval).await;
    background.refresh().await.unwrap();
    assert_eq!(world.fetch_count(), 2);

    background.force_refresh().await.unwrap();
    assert_eq!(world.fetch_count(), 3);
}
