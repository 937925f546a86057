use tracing_subscriber::EnvFilter;

/// Install the stderr `tracing` subscriber.
///
/// `VITRINE_LOG` takes precedence over `default_level` (the resolved
/// `logging.level`). Calling this twice keeps the first subscriber.
pub fn init(default_level: &str) {
    let env_filter = EnvFilter::try_from_env("VITRINE_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
