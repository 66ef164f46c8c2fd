//! Shared domain types and configuration for the pre-mortem signal engine.
//!
//! Holds the founder input (`StartupContext`), the thread/signal records that
//! flow through the engine, the coverage/score structures of the final
//! result, and the env-driven `AppConfig` loader.

pub mod app_config;
pub mod config;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use types::{
    Coverage, EngineResult, RawThread, ResultConfidence, Scores, SearchQuery, SignalThread,
    SignalType, StartupContext,
};
