use crate::shutdown::{Exit, ShutdownSignal, run_until_shutdown};
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use tokio::time;

#[tokio::test]
async fn completes_when_future_finishes_first() {
    let future = async {
        time::sleep(Duration::from_millis(10)).await;
        "completed"
    };

    let shutdown = ShutdownSignal::new().unwrap();
    let called = AtomicBool::new(false);

    let result = run_until_shutdown(future, shutdown, || called.store(true, Ordering::SeqCst)).await;
    assert_eq!(result, Exit::Completed("completed"));
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn shutdown_wins_over_endless_future() {
    let endless = futures::future::pending::<()>();
    let shutdown = time::sleep(Duration::from_millis(10));
    let called = AtomicBool::new(false);

    let result = run_until_shutdown(endless, shutdown, || called.store(true, Ordering::SeqCst)).await;
    assert_eq!(result, Exit::Shutdown);
    assert!(called.load(Ordering::SeqCst));
}
