//! Integration tests for resilience helpers

use quotesync_resilience::{ResilienceError, Timeout};
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_timeout_on_call_that_never_answers() {
    let timeout = Timeout::new(Duration::from_millis(20));
    let (_tx, rx) = oneshot::channel::<u32>();

    let result = timeout.execute(rx).await;
    match result {
        Err(ResilienceError::Timeout(d)) => assert_eq!(d, Duration::from_millis(20)),
        other => panic!("Expected timeout, got {:?}", other.map(|r| r.ok())),
    }
}

#[tokio::test]
async fn test_timeout_passes_through_inner_result() {
    let timeout = Timeout::new(Duration::from_secs(1));
    let (tx, rx) = oneshot::channel::<Result<u32, String>>();
    tx.send(Err("remote said no".to_string())).unwrap();

    let outer = timeout.execute(rx).await.unwrap();
    assert_eq!(outer.unwrap(), Err("remote said no".to_string()));
}
