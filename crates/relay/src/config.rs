use relay_error::ConfigError;
use relay_http::ResilientHttpClientConfig;

/// Build a [`ResilientHttpClientConfig`] from the environment, loading a
/// `.env` file first if one is present. Mirrors the `dotenvy` + plain
/// `std::env::var` pattern used throughout the rest of this workspace's
/// ancestry rather than a config-file parser: this crate has exactly three
/// required settings and no nested structure to justify one.
pub fn load_http_config_from_env() -> Result<ResilientHttpClientConfig, ConfigError> {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("RELAY_BASE_URL")
        .map_err(|_| ConfigError::new("RELAY_BASE_URL is not set"))?;
    let api_key = std::env::var("RELAY_API_KEY")
        .map_err(|_| ConfigError::new("RELAY_API_KEY is not set"))?;
    let app_title = std::env::var("RELAY_APP_TITLE").ok();

    let mut builder = ResilientHttpClientConfig::builder()
        .base_url(base_url)
        .api_key(api_key);
    if let Some(title) = app_title {
        builder = builder.app_title(title);
    }
    Ok(builder.build())
}

/// Install a `tracing-subscriber` formatter driven by `RUST_LOG`, falling
/// back to `info` level. Call once at process start; safe to skip entirely
/// if the embedding application manages its own subscriber.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
