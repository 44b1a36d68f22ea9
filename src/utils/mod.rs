use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Filter used when neither `RUST_LOG` nor a configured directive is present.
pub const DEFAULT_LOG_FILTER: &str = "spendly=info";

/// Initializes the global tracing subscriber, writing to stderr.
///
/// `directive` wins over the default; `RUST_LOG` is honoured when set.
/// Later calls are no-ops.
pub fn init_tracing(directive: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let fallback = directive.unwrap_or(DEFAULT_LOG_FILTER);
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
