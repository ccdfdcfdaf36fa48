//! Test utilities shared across the workspace.

use crate::RecipientId;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Sequential recipient ids starting at `first`.
pub fn recipient_ids(first: u64, count: usize) -> Vec<RecipientId> {
    (first..first + count as u64).map(RecipientId).collect()
}
