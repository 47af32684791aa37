use anyhow::{Context, Result};

pub const DEFAULT_RECENT_COMMENTS_LIMIT: usize = 10;
pub const DEFAULT_EVENT_DURATION_MINUTES: u32 = 60;

/// Engine configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How many comments a recent-comments query returns when the caller
    /// does not say.
    pub recent_comments_limit: usize,
    /// Duration stamped on events created without an explicit one.
    pub default_event_duration_minutes: u32,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        let recent_comments_limit = std::env::var("MEALSYNC_RECENT_COMMENTS_LIMIT")
            .unwrap_or_else(|_| DEFAULT_RECENT_COMMENTS_LIMIT.to_string())
            .parse()
            .with_context(|| "parse MEALSYNC_RECENT_COMMENTS_LIMIT")?;
        let default_event_duration_minutes = std::env::var("MEALSYNC_DEFAULT_EVENT_DURATION_MIN")
            .unwrap_or_else(|_| DEFAULT_EVENT_DURATION_MINUTES.to_string())
            .parse()
            .with_context(|| "parse MEALSYNC_DEFAULT_EVENT_DURATION_MIN")?;
        Ok(Self {
            recent_comments_limit,
            default_event_duration_minutes,
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recent_comments_limit: DEFAULT_RECENT_COMMENTS_LIMIT,
            default_event_duration_minutes: DEFAULT_EVENT_DURATION_MINUTES,
        }
    }
}
