//! Logging setup and span constructors.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter.
pub fn init(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Standardized span constructors.
pub mod spans {
    use crate::auth::Actor;
    use tracing::{Span, info_span};

    /// Span for a request handled by one Operator.
    pub fn operator(actor: &Actor) -> Span {
        info_span!("operator", actor = %actor)
    }

    /// Span for resolving a path.
    pub fn resolve(actor: &Actor, path: &str) -> Span {
        info_span!("resolve", actor = %actor, path = %path)
    }
}
