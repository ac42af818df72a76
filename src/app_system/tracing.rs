/// Installs the global fmt subscriber.
///
/// Filtering follows `RUST_LOG` and falls back to `info`. Output goes to
/// stderr so command output on stdout stays clean.
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
