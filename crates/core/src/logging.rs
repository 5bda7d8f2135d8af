use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Directive applied on top of `RUST_LOG` so the library logs at info by default.
const DEFAULT_DIRECTIVE: &str = "expense_tracker_core=info";

/// Initializes the global tracing subscriber with sensible defaults.
///
/// Safe to call more than once; only the first call installs a subscriber,
/// and an already-installed global subscriber is left alone.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = DEFAULT_DIRECTIVE.parse() {
            filter = filter.add_directive(directive);
        }

        if fmt().with_env_filter(filter).try_init().is_err() {
            tracing::debug!("global tracing subscriber already set");
        }
    });
}
