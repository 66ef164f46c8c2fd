/// Application configuration, loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    /// OpenAI-compatible API key. Required.
    pub openai_api_key: String,
    pub openai_model: String,
    /// Override for the chat-completions base URL (testing / proxies).
    pub openai_base_url: Option<String>,
    /// Override for the Reddit public JSON API base URL (testing).
    pub reddit_base_url: Option<String>,
    pub reddit_user_agent: String,
    pub request_timeout_secs: u64,
    /// Max simultaneous requests against the discussion source.
    pub max_concurrent_requests: usize,
    pub log_level: String,
    /// Max feedback-loop cycles.
    pub max_iterations: u32,
    /// Queries generated in round 1.
    pub initial_queries: usize,
    /// Queries generated per refinement round.
    pub refinement_queries: usize,
    /// Minimum threads needed per signal type before the loop stops early.
    pub min_signals_per_type: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_api_key", &"<redacted>")
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("reddit_base_url", &self.reddit_base_url)
            .field("reddit_user_agent", &self.reddit_user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("log_level", &self.log_level)
            .field("max_iterations", &self.max_iterations)
            .field("initial_queries", &self.initial_queries)
            .field("refinement_queries", &self.refinement_queries)
            .field("min_signals_per_type", &self.min_signals_per_type)
            .finish()
    }
}
