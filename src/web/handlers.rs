// src/web/handlers.rs
use chrono::Utc;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::core::{AgentClient, ScrapeConfig};
use crate::scraping::{format_posts, PostRecord};
use crate::web::services::PostCache;
use crate::web::types::{
    DataResponse, GeneratedPostData, HealthData, StandardErrorResponse, TopicRequest,
};

pub async fn health_handler() -> Json<DataResponse<HealthData>> {
    Json(DataResponse::success(
        "API is running".to_string(),
        HealthData {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339(),
        },
    ))
}

pub async fn get_posts_handler(
    cache: &State<PostCache>,
    config: &State<ScrapeConfig>,
) -> Json<DataResponse<Vec<PostRecord>>> {
    let posts = cache.get_or_scrape(config).await;
    info!("Returning {} scraped posts", posts.len());
    Json(DataResponse::success(
        format!("{} posts available", posts.len()),
        posts,
    ))
}

pub async fn refresh_posts_handler(
    cache: &State<PostCache>,
    config: &State<ScrapeConfig>,
) -> Json<DataResponse<Vec<PostRecord>>> {
    cache.invalidate().await;
    let posts = cache.refresh(config).await;
    Json(DataResponse::success(
        format!("Rescraped profile, {} posts available", posts.len()),
        posts,
    ))
}

/// Run the full generation pipeline: style samples from the cache (scraping
/// on demand), research the topic, then compose a post in the scraped
/// style. The scrape step cannot fail - at worst the style samples describe
/// the failure - so only agent-service errors surface to the caller.
pub async fn generate_post_handler(
    request: Json<TopicRequest>,
    cache: &State<PostCache>,
    config: &State<ScrapeConfig>,
    agent: &State<AgentClient>,
) -> Result<Json<DataResponse<GeneratedPostData>>, Json<StandardErrorResponse>> {
    let topic = request.topic.trim().to_string();
    if topic.is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "Topic is required".to_string(),
            "TOPIC_REQUIRED".to_string(),
            vec!["Provide a non-empty topic field".to_string()],
        )));
    }
    let description = request.description.clone();

    info!("Step 1: collecting style sample posts...");
    let posts = cache.get_or_scrape(config).await;
    let style_samples = format_posts(&posts);

    info!("Step 2: researching topic: {}", topic);
    let research = match agent.research_topic(&topic, description.as_deref()).await {
        Ok(research) => research,
        Err(e) => {
            error!("Research step failed: {e:#}");
            return Err(Json(agent_error(e)));
        }
    };

    info!("Step 3: composing post in the scraped style...");
    let generated = match agent
        .compose_post(&topic, &research, &style_samples, description.as_deref())
        .await
    {
        Ok(generated) => generated,
        Err(e) => {
            error!("Compose step failed: {e:#}");
            return Err(Json(agent_error(e)));
        }
    };

    Ok(Json(DataResponse::success(
        format!("Generated a post about '{topic}'"),
        GeneratedPostData {
            topic,
            description,
            linkedin_posts: posts,
            research_result: research,
            generated_post: generated,
            timestamp: Utc::now().to_rfc3339(),
        },
    )))
}

fn agent_error(e: anyhow::Error) -> StandardErrorResponse {
    StandardErrorResponse::new(
        e.to_string(),
        "AGENT_SERVICE_ERROR".to_string(),
        vec![
            "The generation service may be temporarily unavailable".to_string(),
            "Try again in a few moments".to_string(),
        ],
    )
}
