use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over these when set.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "magento_qty_xml=debug,info"
    } else {
        "magento_qty_xml=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Compact console logs, or one JSON object per event when `json` is set.
/// `verbose` raises this crate to debug in both formats.
pub fn init_logger(verbose: bool, json: bool) {
    let registry = tracing_subscriber::registry().with(env_filter(verbose));
    let layer = fmt::layer().with_target(false).with_file(false).with_line_number(false);

    if json {
        // 轉換結果的欄位 (record_count, direction) 直接放進 JSON
        registry.with(layer.json().flatten_event(true)).init();
    } else {
        registry.with(layer.compact()).init();
    }
}
