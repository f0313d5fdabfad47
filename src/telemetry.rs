//! Logging setup

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` overrides the level chosen
/// by `verbose`. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "tagstrip=debug"
        } else {
            "tagstrip=warn"
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
