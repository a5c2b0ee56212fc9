use tracing_subscriber::EnvFilter;

/// フィルタが環境変数で指定されていないときの既定値。
const DEFAULT_FILTER: &str = "info";

/// ログの出力形式。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum LogFormat {
    /// 人が読むための 1 行形式。
    #[default]
    Plain,
    /// 1 行 1 オブジェクトの JSON。
    Json,
}

/// `tracing` のサブスクライバを標準エラー出力に設定する。
///
/// フィルタは `RUST_LOG`（未設定なら `info`）。すでにグローバルなサブスクライバが
/// 設定されている場合は何もしない。
///
/// 戻り値はこの呼び出しで設定できたかどうか。
#[inline]
pub fn init(format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match format {
        LogFormat::Plain => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.is_ok()
}
