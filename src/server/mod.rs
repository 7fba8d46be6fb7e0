//! Blog HTTP server
//!
//! Every request fetches fresh data from Notion; nothing is cached between
//! requests.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::generator::Generator;
use crate::helpers::blog_url;
use crate::Blog;

/// Server state
struct ServerState {
    blog: Blog,
    generator: Generator,
}

/// Build the router for a blog
pub fn router(blog: Blog) -> Result<Router> {
    let generator = Generator::new(&blog.config)?;
    let root = blog.config.blog_root();
    let state = Arc::new(ServerState { blog, generator });

    let router = if root.is_empty() {
        Router::new().route("/", get(listing_handler))
    } else {
        Router::new()
            .route("/", get(home_handler))
            .route(&root, get(listing_handler))
            .route(&format!("{}/", root), get(listing_handler))
    };

    Ok(router
        .route(&format!("{}/:slug", root), get(post_handler))
        .route(&format!("{}/:slug/", root), get(post_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(blog: Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home_handler(State(state): State<Arc<ServerState>>) -> Redirect {
    Redirect::temporary(&blog_url(&state.blog.config))
}

async fn listing_handler(State(state): State<Arc<ServerState>>) -> Response {
    let entries = state.blog.list_published().await;
    page_response(StatusCode::OK, state.generator.listing_page(&entries))
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.blog.get_by_slug(&slug).await {
        Some(entry) => page_response(StatusCode::OK, state.generator.post_page(&entry)),
        None => page_response(StatusCode::NOT_FOUND, state.generator.not_found_page()),
    }
}

async fn fallback_handler(State(state): State<Arc<ServerState>>) -> Response {
    page_response(StatusCode::NOT_FOUND, state.generator.not_found_page())
}

fn page_response(status: StatusCode, html: Result<String>) -> Response {
    match html {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}
