use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

static INIT: OnceLock<()> = OnceLock::new();

/// Route the crate's `tracing` events to the test harness output.
///
/// Honours `RUST_LOG` (defaults to `info`); use `RUST_LOG=tutil=debug` to see
/// each allocation, option and release. Safe to call from every test.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(true).with_test_writer());
        // A test binary that installs its own subscriber first keeps it.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
