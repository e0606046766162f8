use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;
use tracing_tree::time::Uptime;

use crate::common::config::LogSettings;

const FALLBACK_FILTER: &str = "info";

/// `RUST_LOG` wins over the configured filter when it is set and valid.
pub fn env_filter(settings: &LogSettings) -> EnvFilter {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    choose_filter(from_env.as_deref(), settings)
}

fn choose_filter(from_env: Option<&str>, settings: &LogSettings) -> EnvFilter {
    from_env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(&settings.filter).ok())
        .unwrap_or_else(|| EnvFilter::new(FALLBACK_FILTER))
}

pub fn init_logging(settings: &LogSettings) {
    let tree = HierarchicalLayer::default()
        .with_writer(std::io::stderr)
        .with_indent_lines(true)
        .with_indent_amount(2)
        .with_targets(true)
        .with_deferred_spans(true)
        .with_timer(Uptime::default());

    if Registry::default().with(env_filter(settings)).with(tree).try_init().is_err() {
        eprintln!("compass: a global tracing subscriber was already installed");
    }
}
