//! Scrapes a LinkedIn profile's posts through a real browser session,
//! normalizes them into structured records, and generates new posts in the
//! scraped writing style via an external agent service.

pub mod core;
pub mod scraping;
pub mod utils;
pub mod web;

pub use crate::core::{AgentClient, ConfigManager, ScrapeConfig};
pub use crate::scraping::{collect_posts, scrape_styled_posts, PostRecord, ScrapeError};
pub use crate::web::start_web_server;
