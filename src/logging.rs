use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{Builder, LevelFilter};

pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;

pub fn filter_builder() -> Builder {
    EnvFilter::builder().with_default_directive(DEFAULT_LEVEL.into())
}

pub fn env_filter() -> EnvFilter {
    filter_builder().from_env_lossy()
}
