//! Diagnostic tracing for the supervision engine.
//!
//! Engine operations and worker ticks emit `tracing` events carrying the run
//! `generation`, so a superseded worker can be told apart from the live one.
//! These events are for operators only: the agent's audit trail is the
//! [`action_log`](crate::action_log), which is recorded regardless of the
//! filter set here.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directive used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the stderr subscriber used by the `supervisor` binary.
///
/// Stdout is reserved for plan JSON and the streamed action log, so
/// diagnostics go to stderr in compact form. Turn on worker tick tracing with
/// `RUST_LOG=supervisor=debug`.
pub fn init() {
    let filter = filter_from(std::env::var("RUST_LOG").ok().as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn filter_from(raw: Option<&str>) -> EnvFilter {
    raw.and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_falls_back_to_warn() {
        assert_eq!(filter_from(None).to_string(), DEFAULT_DIRECTIVE);
    }

    #[test]
    fn explicit_directive_is_kept() {
        assert_eq!(
            filter_from(Some("supervisor=debug")).to_string(),
            "supervisor=debug"
        );
    }
}
