#![deny(missing_docs)]
//! Test utilities for GraphWeft.

use rand::Rng;

pub mod block;
pub mod id;
pub mod peer_manager;
pub mod query_queue;
pub mod response_sender;

/// Generate some random bytes.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let mut out = vec![0; len];
    rng.fill(&mut out[..]);
    out
}

/// Enable tracing with the RUST_LOG environment variable.
///
/// This is intended to be used in tests, so it defaults to DEBUG level.
pub fn enable_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::DEBUG.into())
                .from_env_lossy(),
        )
        .try_init();
}

/// Run a check body repeatedly until it breaks out or the timeout elapses.
///
/// The body runs every 10 ms; break out of the loop when the condition
/// under test is satisfied. Panics when the timeout (default 1 s) elapses
/// first.
#[macro_export]
macro_rules! iter_check {
    ($body:block) => {
        $crate::iter_check!(1000, $body)
    };
    ($timeout_ms:expr, $body:block) => {{
        let deadline = std::time::Instant::now()
            + std::time::Duration::from_millis($timeout_ms);
        loop {
            $body
            if std::time::Instant::now() > deadline {
                panic!("iter_check timed out");
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }};
}
