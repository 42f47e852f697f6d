// src/scraping/navigator.rs
//! Drives an authenticated session through the profile sections. Every
//! DOM lookup that fails is handled here as "section absent": one missing
//! section degrades the scrape to fewer posts, never to a failure.

use std::thread;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::extractor;
use super::session::ProfileSession;
use super::RawFragment;
use crate::core::config_manager::ScrapeConfig;

const ARTICLES_LINK: &str = "a[href*='/detail/recent-activity/posts/']";
const ACTIVITY_LINK: &str = "a[href*='/detail/recent-activity/']";

/// Fragments that must exist after the Articles/Featured/Activity passes
/// before the About section is skipped as a content source.
const ABOUT_FALLBACK_THRESHOLD: usize = 2;

/// Walk the profile sections in order and collect raw fragments from each.
/// Only the initial profile navigation can fail; each section attempt is
/// caught and logged locally.
pub fn collect_fragments(
    session: &ProfileSession,
    config: &ScrapeConfig,
) -> Result<Vec<RawFragment>> {
    session
        .open_profile()
        .context("Could not reach the profile page")?;

    info!("Scrolling to load more content...");
    session.scroll_page(config.scroll_passes);

    let mut fragments = Vec::new();

    info!("Checking for articles...");
    match visit_articles(session, config) {
        Ok(mut articles) => fragments.append(&mut articles),
        Err(e) => info!("Articles section skipped: {e}"),
    }

    info!("Looking for the Featured section...");
    match session.page_source() {
        Ok(source) => {
            fragments.extend(extractor::extract_featured(&source, config.max_featured_items))
        }
        Err(e) => warn!("Featured section skipped: {e}"),
    }

    info!("Looking for posts in the activity feed...");
    match visit_activity(session, config) {
        Ok(mut posts) => fragments.append(&mut posts),
        Err(e) => warn!("Activity section skipped: {e}"),
    }

    if fragments.len() < ABOUT_FALLBACK_THRESHOLD {
        info!("Few posts found so far, falling back to the About section...");
        match visit_about(session) {
            Ok(mut about) => fragments.append(&mut about),
            Err(e) => info!("About section skipped: {e}"),
        }
    }

    Ok(fragments)
}

/// Open the recent-activity articles page if the profile links to one,
/// capture it, then return to the base profile.
fn visit_articles(session: &ProfileSession, config: &ScrapeConfig) -> Result<Vec<RawFragment>> {
    let link = session
        .tab()
        .find_element(ARTICLES_LINK)
        .context("no articles link on profile")?;
    session.pause(config.action_delay);
    link.click().context("articles link did not respond")?;
    thread::sleep(config.short_wait);

    let source = session.page_source()?;
    let articles = extractor::extract_articles(&source, config.max_articles);
    info!("Found {} article fragments", articles.len());

    session
        .open_profile()
        .context("could not return to profile after articles")?;
    Ok(articles)
}

/// Prefer the "see all activity" page; fall back to whatever posts are
/// visible on the current page when the link is absent.
fn visit_activity(session: &ProfileSession, config: &ScrapeConfig) -> Result<Vec<RawFragment>> {
    match session.tab().find_element(ACTIVITY_LINK) {
        Ok(link) => {
            session.pause(config.action_delay);
            match link.click() {
                Ok(_) => thread::sleep(config.short_wait),
                Err(e) => info!("Activity link did not respond, using current page: {e}"),
            }
        }
        Err(_) => info!("No activity link found, using posts on the current page"),
    }

    let source = session.page_source()?;
    let posts = extractor::extract_activity(&source, config.max_activity_posts);
    info!("Found {} activity fragments", posts.len());
    Ok(posts)
}

fn visit_about(session: &ProfileSession) -> Result<Vec<RawFragment>> {
    // The activity pass may have navigated away from the profile.
    session.open_profile()?;
    let source = session.page_source()?;
    Ok(extractor::extract_about(&source))
}
