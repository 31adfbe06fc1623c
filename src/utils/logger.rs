use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` 優先，其次是設定檔的 level，最後才是預設值
fn build_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match level {
        Some(directives) => EnvFilter::new(directives),
        None if verbose => EnvFilter::new("altitude_temp=debug,info"),
        None => EnvFilter::new("altitude_temp=info"),
    })
}

/// Human-readable logs on stderr, so stdout stays free for command output.
pub fn init_cli_logger(verbose: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(), // JSON for container log collectors
        )
        .init();
}

pub fn init_logger(verbose: bool, json: bool, level: Option<&str>) {
    if json {
        init_json_logger(verbose, level);
    } else {
        init_cli_logger(verbose, level);
    }
}
