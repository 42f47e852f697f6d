// src/web/mod.rs
pub mod handlers;
pub mod services;
pub mod types;

pub use types::*;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use tracing::info;

use crate::core::{AgentClient, ConfigManager};
use crate::scraping::PostRecord;
use services::PostCache;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[get("/health")]
pub async fn health() -> Json<DataResponse<HealthData>> {
    handlers::health_handler().await
}

#[get("/posts")]
pub async fn get_posts(
    cache: &State<PostCache>,
    config: &State<crate::core::ScrapeConfig>,
) -> Json<DataResponse<Vec<PostRecord>>> {
    handlers::get_posts_handler(cache, config).await
}

#[post("/posts/refresh")]
pub async fn refresh_posts(
    cache: &State<PostCache>,
    config: &State<crate::core::ScrapeConfig>,
) -> Json<DataResponse<Vec<PostRecord>>> {
    handlers::refresh_posts_handler(cache, config).await
}

#[post("/generate", data = "<request>")]
pub async fn generate_post(
    request: Json<TopicRequest>,
    cache: &State<PostCache>,
    config: &State<crate::core::ScrapeConfig>,
    agent: &State<AgentClient>,
) -> Result<Json<DataResponse<GeneratedPostData>>, Json<StandardErrorResponse>> {
    handlers::generate_post_handler(request, cache, config, agent).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
    ))
}

// Main server start function
pub async fn start_web_server(config: ConfigManager, port: u16) -> Result<()> {
    let agent_client = AgentClient::new(
        config.service.agent_service_url.clone(),
        config.service.timeout_seconds,
    )?;

    info!("Starting LinkedIn post generator API server");
    info!("Target profile: {}", config.scrape.profile_name);
    info!(
        "Soft scrape deadline: about {:?} worst case",
        config.scrape.worst_case_wait()
    );

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    let _rocket = rocket::custom(figment)
        .attach(Cors)
        .manage(config.scrape.clone())
        .manage(agent_client)
        .manage(PostCache::new())
        .register("/api", catchers![bad_request, internal_error])
        .mount(
            "/api",
            routes![health, get_posts, refresh_posts, generate_post, options],
        )
        .launch()
        .await?;

    Ok(())
}
