use tracing_subscriber::{fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログ出力を初期化する（`RUST_LOG` 優先、未指定なら info / verbose 時 debug）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            layer()
                .with_file(verbose)
                .with_line_number(verbose)
                .with_thread_ids(verbose)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
