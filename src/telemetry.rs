use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level`, e.g.
///   RUST_LOG=debug                          - everything at debug
///   RUST_LOG=rhourtracker::store=trace      - only the store
/// Output goes to stderr so it never mixes with command output.
pub fn init_tracing(log_level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    // a subscriber may already be installed
    if json_format {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }
}
