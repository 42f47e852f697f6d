// src/scraping/session.rs
use std::ffi::OsStr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use rand::Rng;
use tracing::{info, warn};

use crate::core::config_manager::{DelayRange, ScrapeConfig};
use crate::utils::contains_any_ci;

const LOGIN_URL: &str = "https://www.linkedin.com/login";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Phrases LinkedIn shows on its verification interstitials. Matched
/// case-insensitively against the whole page source.
const CHALLENGE_MARKERS: &[&str] = &["security check", "security verification"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    SecurityChallenge,
}

/// One exclusive browser session against a LinkedIn profile. The Chrome
/// process is tied to the `Browser` handle, so dropping the session on any
/// exit path tears the process down.
pub struct ProfileSession<'a> {
    config: &'a ScrapeConfig,
    browser: Browser,
    tab: Arc<Tab>,
}

impl<'a> ProfileSession<'a> {
    /// Launch an isolated browser configured to look less like automation:
    /// no automation blink flag, no notification/popup prompts, a desktop
    /// user agent.
    pub fn open(config: &'a ScrapeConfig) -> Result<ProfileSession<'a>> {
        let launch_args: Vec<&OsStr> = [
            "--disable-notifications",
            "--disable-popup-blocking",
            "--disable-blink-features=AutomationControlled",
            "--no-first-run",
            "--no-default-browser-check",
            "--window-size=1920,1080",
        ]
        .iter()
        .map(OsStr::new)
        .collect();

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false)
            .idle_browser_timeout(Duration::from_secs(300))
            .args(launch_args)
            .build()
            .map_err(|e| anyhow::anyhow!("invalid browser launch options: {e}"))?;

        let browser = Browser::new(options).context("Failed to launch browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;
        tab.set_user_agent(USER_AGENT, None, None)
            .context("Failed to set user agent")?;

        Ok(ProfileSession {
            config,
            browser,
            tab,
        })
    }

    pub fn tab(&self) -> &Tab {
        &self.tab
    }

    /// Log in with human-paced keystrokes. A detected security challenge is
    /// reported but never treated as fatal: the session sleeps through the
    /// configured grace window so the check can be resolved out-of-band,
    /// then proceeds regardless of outcome.
    pub fn login(&self, email: &str, password: &str) -> Result<AuthOutcome> {
        info!("Logging in to LinkedIn...");
        self.tab
            .navigate_to(LOGIN_URL)
            .context("Failed to open login page")?;
        self.tab.wait_until_navigated()?;
        self.pause(self.config.action_delay);

        let mut challenged = self.check_security_challenge("initial page load");

        self.type_into("#username", email)
            .context("Failed to fill username field")?;
        self.pause(self.config.scroll_delay);
        self.type_into("#password", password)
            .context("Failed to fill password field")?;
        self.pause(self.config.action_delay);
        self.tab.press_key("Enter").context("Failed to submit login")?;

        info!("Waiting for login to complete...");
        thread::sleep(self.config.long_wait);

        if self.check_security_challenge("login") {
            challenged = true;
        }

        Ok(if challenged {
            AuthOutcome::SecurityChallenge
        } else {
            AuthOutcome::Success
        })
    }

    /// Navigate to the base profile page and let it settle.
    pub fn open_profile(&self) -> Result<()> {
        let url = format!("https://www.linkedin.com/in/{}/", self.config.profile_name);
        self.tab
            .navigate_to(&url)
            .with_context(|| format!("Failed to open profile {url}"))?;
        self.tab.wait_until_navigated()?;
        thread::sleep(self.config.medium_wait);
        self.check_security_challenge("profile page");
        Ok(())
    }

    pub fn page_source(&self) -> Result<String> {
        self.tab.get_content().context("Failed to read page source")
    }

    /// Scroll the viewport down in randomized increments so lazy-loaded
    /// content appears before extraction.
    pub fn scroll_page(&self, passes: u32) {
        let mut rng = rand::thread_rng();
        for _ in 0..passes {
            let amount: u32 = rng.gen_range(300..=500);
            if let Err(e) = self
                .tab
                .evaluate(&format!("window.scrollBy(0, {amount});"), false)
            {
                warn!("Scroll step failed: {e}");
                return;
            }
            self.pause(self.config.scroll_delay);
        }
    }

    /// Sleep for a random duration in the given range. All interactive
    /// actions are paced through this.
    pub fn pause(&self, range: DelayRange) {
        thread::sleep(range.sample());
    }

    /// True when the current page looks like a verification interstitial.
    /// On detection the session yields the configured grace window for
    /// manual resolution; there is no automated challenge solving.
    fn check_security_challenge(&self, stage: &str) -> bool {
        let source = match self.tab.get_content() {
            Ok(source) => source,
            Err(e) => {
                warn!("Could not read page source during {stage}: {e}");
                return false;
            }
        };
        if contains_any_ci(&source, CHALLENGE_MARKERS) {
            warn!(
                "Security check detected during {stage}; waiting {:?} for manual resolution",
                self.config.security_check_wait
            );
            thread::sleep(self.config.security_check_wait);
            return true;
        }
        false
    }

    fn type_into(&self, selector: &str, text: &str) -> Result<()> {
        let field = self.tab.find_element(selector)?;
        field.click()?;
        for ch in text.chars() {
            self.tab.type_str(&ch.to_string())?;
            self.pause(self.config.keystroke_delay);
        }
        Ok(())
    }

    /// Explicit teardown for the happy path; the browser process also dies
    /// with the handle on every other exit path.
    pub fn close(self) {
        info!("Closing browser session");
        drop(self.tab);
        drop(self.browser);
    }
}
