use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout carries only the report.
///
/// `RUST_LOG` applies unless `verbose` is set, which forces debug output for
/// this crate.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(format!("warn,{}=debug", env!("CARGO_CRATE_NAME")))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
