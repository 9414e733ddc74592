use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter: warnings only, or everything from this crate at debug with `--verbose`.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "podium=debug,warn"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Events go to stderr so table and CSV output
/// on stdout stays clean. `RUST_LOG` overrides the default filter.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
