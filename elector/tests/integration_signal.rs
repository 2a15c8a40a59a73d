//! Termination signals delivered to the process.

#![cfg(unix)]

use elector::ShutdownSignal;
use std::process::Command;
use std::time::Duration;

#[tokio::test]
async fn test_sigterm_before_wait_is_not_lost() {
    let signal = ShutdownSignal::install().unwrap();

    // Delivered while nothing is waiting yet, as during startup.
    let status = Command::new("kill")
        .args(["-TERM", &std::process::id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    tokio::time::timeout(Duration::from_secs(5), signal.wait())
        .await
        .expect("SIGTERM was not observed")
        .unwrap();
}
