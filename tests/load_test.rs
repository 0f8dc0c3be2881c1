//! Load testing for the router.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tube_router::{Job, Router};

mod common;
use common::Tracker;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_limit_holds_under_contention() {
    let limit = 4;
    let producers = 8;
    let jobs_per_producer = 50;
    let total = producers * jobs_per_producer;

    let router = Arc::new(Router::new());
    let tracker = Tracker::new(Duration::from_millis(2));
    router.register("emails", tracker.clone(), limit);

    let start = Instant::now();
    let mut tasks = Vec::new();
    for p in 0..producers {
        let router = router.clone();
        tasks.push(tokio::spawn(async move {
            for i in 0..jobs_per_producer {
                router.dispatch(Job::new("emails", format!("{}-{}", p, i))).await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert!(tracker.wait_completed(total, Duration::from_secs(10)).await);
    println!("{} jobs through limit {} in {:?}", total, limit, start.elapsed());

    assert_eq!(tracker.completed(), total, "no job dropped");
    assert!(tracker.peak() <= limit, "peak {} exceeded limit {}", tracker.peak(), limit);

    // The handler counts itself done before its task drops the permit.
    tokio::time::timeout(Duration::from_secs(1), router.idle())
        .await
        .expect("router idle");
    assert_eq!(router.stats_for("emails").unwrap().in_flight, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_independent_limits_across_tubes() {
    let router = Arc::new(Router::new());
    let tubes = [("serial", 1usize), ("narrow", 3), ("wide", 8)];
    let jobs_per_tube = 60;

    let mut trackers = Vec::new();
    for (tube, limit) in tubes {
        let tracker = Tracker::new(Duration::from_millis(3));
        router.register(tube, tracker.clone(), limit);
        trackers.push((tube, limit, tracker));
    }

    let mut tasks = Vec::new();
    for (tube, _) in tubes {
        for _ in 0..3 {
            let router = router.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..jobs_per_tube / 3 {
                    router.dispatch(Job::new(tube, "")).await;
                }
            }));
        }
    }
    for task in tasks {
        task.await.unwrap();
    }

    for (tube, limit, tracker) in trackers {
        assert!(
            tracker.wait_completed(jobs_per_tube, Duration::from_secs(10)).await,
            "tube {} did not finish",
            tube
        );
        assert!(tracker.peak() <= limit, "tube {} peak {} > {}", tube, tracker.peak(), limit);
    }

    tokio::time::timeout(Duration::from_secs(1), router.idle())
        .await
        .expect("router idle");
}
