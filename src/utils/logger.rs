use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over the built-in directive.
fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Human-readable logs on stderr; stdout stays free for component output.
pub fn init_cli_logger(verbose: bool) {
    let directive = if verbose {
        "pipeline_components=debug,info"
    } else {
        "pipeline_components=info"
    };

    tracing_subscriber::registry()
        .with(filter(directive))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// JSON lines on stderr, for log collectors.
pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(filter("pipeline_components=info"))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .json(),
        )
        .init();
}
