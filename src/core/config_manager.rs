// src/core/config_manager.rs
//! Unified configuration management - one env-driven load for the scraper
//! and the agent service.

use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub scrape: ScrapeConfig,
    pub service: ServiceConfig,
}

/// Bounds for one randomized pause, in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Uniform random duration within the bounds.
    pub fn sample(&self) -> Duration {
        let mut rng = rand::thread_rng();
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

/// Everything one scrape reads: target profile, credentials, pacing bounds,
/// settle periods, and per-section item caps.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub profile_name: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub headless: bool,
    /// Pause between generic interactive actions.
    pub action_delay: DelayRange,
    /// Pause between individual keystrokes while typing credentials.
    pub keystroke_delay: DelayRange,
    /// Pause between scroll steps.
    pub scroll_delay: DelayRange,
    pub short_wait: Duration,
    pub medium_wait: Duration,
    pub long_wait: Duration,
    /// Grace window yielded for out-of-band security-challenge resolution.
    pub security_check_wait: Duration,
    pub scroll_passes: u32,
    pub max_featured_items: usize,
    pub max_articles: usize,
    pub max_activity_posts: usize,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub agent_service_url: String,
    pub timeout_seconds: u64,
}

impl ConfigManager {
    /// Load all configurations from the environment.
    pub fn load() -> Result<Self> {
        Ok(Self {
            scrape: ScrapeConfig::from_env(),
            service: ServiceConfig::from_env(),
        })
    }
}

impl ScrapeConfig {
    pub fn from_env() -> Self {
        let profile_name =
            std::env::var("LINKEDIN_PROFILE_NAME").unwrap_or_else(|_| "meta".to_string());
        info!("Scrape configuration loaded for profile: {}", profile_name);

        Self {
            profile_name,
            email: std::env::var("LINKEDIN_EMAIL").ok(),
            password: std::env::var("LINKEDIN_PASSWORD").ok(),
            headless: env_parse("SCRAPER_HEADLESS", true),
            action_delay: DelayRange::new(
                env_parse("DEFAULT_MIN_DELAY_MS", 1_000),
                env_parse("DEFAULT_MAX_DELAY_MS", 3_000),
            ),
            keystroke_delay: DelayRange::new(
                env_parse("KEYSTROKE_MIN_DELAY_MS", 50),
                env_parse("KEYSTROKE_MAX_DELAY_MS", 150),
            ),
            scroll_delay: DelayRange::new(
                env_parse("SCROLL_MIN_DELAY_MS", 800),
                env_parse("SCROLL_MAX_DELAY_MS", 1_500),
            ),
            short_wait: Duration::from_secs(env_parse("SHORT_PAGE_LOAD_WAIT_SECS", 5)),
            medium_wait: Duration::from_secs(env_parse("MEDIUM_PAGE_LOAD_WAIT_SECS", 7)),
            long_wait: Duration::from_secs(env_parse("LONG_PAGE_LOAD_WAIT_SECS", 8)),
            security_check_wait: Duration::from_secs(env_parse("SECURITY_CHECK_WAIT_SECS", 5)),
            scroll_passes: env_parse("SCROLL_PASSES", 5),
            max_featured_items: env_parse("MAX_FEATURED_ITEMS", 10),
            max_articles: env_parse("MAX_ARTICLES", 5),
            max_activity_posts: env_parse("MAX_POSTS", 7),
        }
    }

    /// Both credentials, or nothing. Checked before any browser launch.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some((email.clone(), password.clone())),
            _ => None,
        }
    }

    /// Soft deadline for one scrape: the sum of every configured wait. A
    /// scrape blocks, at worst, for roughly this long before returning.
    pub fn worst_case_wait(&self) -> Duration {
        let paced_actions = 8 * self.action_delay.max_ms
            + u64::from(self.scroll_passes) * self.scroll_delay.max_ms;
        Duration::from_millis(paced_actions)
            + self.short_wait * 3
            + self.medium_wait * 2
            + self.long_wait
            + self.security_check_wait * 3
    }
}

impl ServiceConfig {
    fn from_env() -> Self {
        let agent_service_url = std::env::var("AGENT_SERVICE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());

        Self {
            agent_service_url,
            timeout_seconds: env_parse("AGENT_SERVICE_TIMEOUT_SECS", 120),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_range_sample_stays_in_bounds() {
        let range = DelayRange::new(10, 20);
        for _ in 0..50 {
            let sampled = range.sample();
            assert!(sampled >= Duration::from_millis(10));
            assert!(sampled <= Duration::from_millis(20));
        }
    }

    #[test]
    fn credentials_require_both_values() {
        let mut config = test_config();
        config.email = Some("user@example.com".to_string());
        config.password = None;
        assert!(config.credentials().is_none());

        config.password = Some("hunter2".to_string());
        assert!(config.credentials().is_some());
    }

    #[test]
    fn worst_case_wait_is_bounded() {
        assert!(test_config().worst_case_wait() >= Duration::from_secs(9));
    }

    fn test_config() -> ScrapeConfig {
        ScrapeConfig {
            profile_name: "alice".to_string(),
            email: None,
            password: None,
            headless: true,
            action_delay: DelayRange::new(0, 1_000),
            keystroke_delay: DelayRange::new(0, 10),
            scroll_delay: DelayRange::new(0, 100),
            short_wait: Duration::from_secs(1),
            medium_wait: Duration::from_secs(1),
            long_wait: Duration::from_secs(1),
            security_check_wait: Duration::from_secs(1),
            scroll_passes: 5,
            max_featured_items: 10,
            max_articles: 5,
            max_activity_posts: 7,
        }
    }
}
