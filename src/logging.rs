use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Filter from `directives` (normally `RUST_LOG`), falling back to [`DEFAULT_FILTER`].
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global fmt subscriber honoring `RUST_LOG`.
pub fn init() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(rust_log.as_deref()))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_level_is_kept() {
        assert_eq!(env_filter(Some("debug")).to_string(), "debug");
        assert_eq!(
            env_filter(Some("portwatch=trace")).to_string(),
            "portwatch=trace"
        );
    }

    #[test]
    fn unset_falls_back_to_info() {
        assert_eq!(env_filter(None).to_string(), "info");
    }

    #[test]
    fn unparsable_falls_back_to_info() {
        assert_eq!(env_filter(Some("portwatch=loud")).to_string(), "info");
    }
}
