// src/scraping/mod.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::core::config_manager::ScrapeConfig;

pub mod extractor;
pub mod formatter;
pub mod navigator;
pub mod normalizer;
pub mod session;

pub use formatter::{format_posts, parse_posts};
pub use session::{AuthOutcome, ProfileSession};

/// Profile area a fragment was captured from. Sections are visited in this
/// order; About only as a fallback content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    Article,
    Featured,
    Activity,
    About,
}

/// Raw text pulled from one page container, before any title/content split.
#[derive(Debug, Clone)]
pub struct RawFragment {
    pub section: SectionKind,
    pub raw_text: String,
    pub url: Option<String>,
}

/// One scraped post as exposed to consumers. `index` reflects discovery
/// order at normalization time; rendering order stays authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(default)]
    pub index: usize,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("LinkedIn credentials not configured: set LINKEDIN_EMAIL and LINKEDIN_PASSWORD")]
    CredentialsMissing,
    #[error("browser session failed: {0}")]
    SessionFatal(String),
}

/// Run one full scrape: open a browser session, log in, walk the profile
/// sections, and normalize whatever was found. Per-section and per-container
/// failures are handled where they occur; only missing credentials and a
/// dead session surface here.
pub fn collect_posts(config: &ScrapeConfig) -> Result<Vec<PostRecord>, ScrapeError> {
    let (email, password) = config
        .credentials()
        .ok_or(ScrapeError::CredentialsMissing)?;

    info!("Scraping posts from profile: {}", config.profile_name);

    let session = ProfileSession::open(config).map_err(|e| {
        error!("Failed to launch browser session: {e:#}");
        ScrapeError::SessionFatal(e.to_string())
    })?;

    let outcome = match session.login(&email, &password) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Login failed: {e:#}");
            session.close();
            return Err(ScrapeError::SessionFatal(e.to_string()));
        }
    };
    if outcome == AuthOutcome::SecurityChallenge {
        info!("Security challenge was encountered during login, continuing anyway");
    }

    let fragments = match navigator::collect_fragments(&session, config) {
        Ok(fragments) => fragments,
        Err(e) => {
            error!("Profile navigation failed: {e:#}");
            session.close();
            return Err(ScrapeError::SessionFatal(e.to_string()));
        }
    };
    session.close();

    info!("Collected {} raw fragments", fragments.len());
    Ok(normalizer::normalize(fragments, &config.profile_name))
}

/// Scrape and render as the numbered-list text consumed by the generation
/// step. Never fails: total failures come back as a descriptive sentence so
/// callers always receive well-formed text.
pub fn scrape_styled_posts(config: &ScrapeConfig) -> String {
    match collect_posts(config) {
        Ok(posts) => format_posts(&posts),
        Err(e) => format!("There was an error scraping the LinkedIn profile: {e}"),
    }
}

/// Record-producing variant for the service layer: errors degrade to a
/// single error-shaped record instead of an empty or exceptional result.
pub fn scrape_or_placeholder(config: &ScrapeConfig) -> Vec<PostRecord> {
    match collect_posts(config) {
        Ok(posts) => posts,
        Err(e) => vec![PostRecord {
            index: 1,
            title: "LinkedIn Profile Information".to_string(),
            content: format!(
                "Could not scrape posts from the LinkedIn profile {}: {e}",
                config.profile_name
            ),
            url: None,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_PAGE: &str = r#"
        <html><body>
        <section><span>Featured</span>
        <ul><li>Why we moved off the monolith
The migration took four months and here is everything that went wrong.</li></ul>
        </section>
        <div class="feed-shared-update-v2">
          <div class="update-components-text">42 likes · 7 comments
Lessons from a production incident
The pager went off at 3am and this is what we found.</div>
          <a href="https://www.linkedin.com/posts/alice_incident-review-activity-7211111111111111111-wxyz">link</a>
        </div>
        </body></html>"#;

    #[test]
    fn synthetic_page_yields_ordered_records_per_section() {
        let mut fragments = extractor::extract_featured(PROFILE_PAGE, 10);
        fragments.extend(extractor::extract_activity(PROFILE_PAGE, 10));

        let posts = normalizer::normalize(fragments, "alice");
        assert_eq!(posts.len(), 2);

        // Featured before Activity, matching section visit order.
        assert_eq!(posts[0].title, "Why we moved off the monolith");
        assert_eq!(posts[1].title, "Lessons from a production incident");
        assert_eq!(posts[1].content, "The pager went off at 3am and this is what we found.");
        assert!(posts[1].url.as_deref().unwrap().contains("/posts/"));
        assert_eq!(posts[0].index, 1);
        assert_eq!(posts[1].index, 2);

        let formatted = format_posts(&posts);
        let parsed = parse_posts(&formatted);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, posts[0].title);
        assert_eq!(parsed[1].content, posts[1].content);
    }

    #[test]
    fn missing_credentials_fail_before_any_browser_launch() {
        let mut config = ScrapeConfig::from_env();
        config.email = None;
        config.password = None;
        assert!(matches!(
            collect_posts(&config),
            Err(ScrapeError::CredentialsMissing)
        ));
    }

    #[test]
    fn placeholder_records_are_always_well_formed_text() {
        let mut config = ScrapeConfig::from_env();
        config.email = None;
        config.password = None;

        let text = scrape_styled_posts(&config);
        assert!(text.contains("error scraping"));

        let records = scrape_or_placeholder(&config);
        assert_eq!(records.len(), 1);
        assert!(!records[0].title.is_empty());
    }
}
