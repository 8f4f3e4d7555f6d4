use axum::http::{HeaderValue, Method};
use std::path::PathBuf;
use std::sync::Arc;
use tagmap::catalog::storefront_registry;
use tagmap::TagIndex;
use tagmap_api::app::build_app;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cors_layer = CorsLayer::new()
        .allow_origin(vec![HeaderValue::from_static("http://localhost:5173")])
        .allow_methods([Method::GET, Method::POST, Method::DELETE]);

    let db_path = PathBuf::from(
        std::env::var("TAGMAP_DB").unwrap_or_else(|_| "./data/tag-db.json".to_owned()),
    );

    let index = TagIndex::create_from_db(&db_path)
        .unwrap_or_else(|_| TagIndex::new(storefront_registry()));
    println!("serving index with {} attachments", index.association_count());

    let shared_index = Arc::new(RwLock::new(index));

    let app = build_app(shared_index).layer(cors_layer);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
