use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 預設只看本服務的 info 訊息
pub const DEFAULT_DIRECTIVES: &str = "weekend_planner=info";
/// `--verbose` 時連同 tower-http 的請求紀錄一起輸出
pub const VERBOSE_DIRECTIVES: &str = "weekend_planner=debug,tower_http=debug,info";

/// `RUST_LOG` 有設定時以它為準
fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

fn cli_directives(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    }
}

pub fn init_cli_logger(verbose: bool) {
    let result = tracing_subscriber::registry()
        .with(env_filter(cli_directives(verbose)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();

    if let Err(e) = result {
        eprintln!("⚠️ Logger already initialized: {}", e);
    }
}

/// 函式平台自帶時間戳，輸出單行 JSON 方便日誌收集器解析
pub fn init_lambda_logger() {
    let result = tracing_subscriber::registry()
        .with(env_filter(DEFAULT_DIRECTIVES))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .json()
                .with_current_span(false),
        )
        .try_init();

    if let Err(e) = result {
        eprintln!("⚠️ Logger already initialized: {}", e);
    }
}
