use derive_getters::Getters;
use typed_builder::TypedBuilder;

/// Configuration for [`crate::ResilientHttpClient`].
///
/// Deliberately free of process-environment concerns: the facade crate reads
/// `OPENAI_API_KEY`/`OPENAI_BASE_URL`-style variables and builds one of
/// these, keeping this crate testable without touching the environment.
#[derive(Debug, Clone, Getters, TypedBuilder)]
pub struct ResilientHttpClientConfig {
    #[builder(setter(into))]
    base_url: String,
    #[builder(setter(into))]
    api_key: String,
    #[builder(setter(into), default = "relay-http/0.1".to_string())]
    user_agent: String,
    #[builder(default, setter(strip_option, into))]
    app_title: Option<String>,
}
