//! Shared helpers for the `taskwave` integration tests.

pub mod builders;
pub mod fake_executor;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for a whole test run; well above any timeout the tests configure.
pub const TEST_DEADLINE: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Output is captured per test and only shown for failures (or with
/// `--nocapture`). Filter with `RUST_LOG`, e.g. `RUST_LOG=taskwave=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskwave=info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, failing the test if it has not settled within [`TEST_DEADLINE`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    within(TEST_DEADLINE, f).await
}

/// Await `f`, failing the test if it has not settled within `limit`.
///
/// Used where a test asserts that a hung or slow task does not hold up the
/// run for longer than its configured attempt timeout.
pub async fn within<F, T>(limit: Duration, f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, f).await {
        Ok(value) => value,
        Err(_) => panic!("run did not settle within {}ms", limit.as_millis()),
    }
}
