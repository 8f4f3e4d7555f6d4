use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tagmap::{Association, AssociationId, IndexError, Tag, TagId, TagIndex, TagLabel};
use tokio::sync::RwLock;
use tower_http::trace::{self, TraceLayer};
use tower_http::validate_request::ValidateRequestHeaderLayer;
use tracing::Level;

/// The index behind a lock so that a cascade delete is never observed
/// half-applied by a concurrent query.
pub type SharedIndex = Arc<RwLock<TagIndex>>;

pub fn build_app(index: SharedIndex) -> Router {
    let app = Router::new()
        .route("/", get(root))
        .route("/tags", get(all_tags).post(create_tag))
        .route("/tags/{id}", get(tag_by_id).delete(delete_tag))
        .route("/attachments", post(attach))
        .route("/attachments/{id}", delete(detach))
        .route("/tags_for/{kind}/{entity_id}", get(tags_for))
        .route("/entities_for/{tag_id}", get(entities_for))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(index);

    let allow_token = std::env::var("ALLOW_TOKEN").ok();
    if let Some(allow_token) = allow_token {
        app.layer(ValidateRequestHeaderLayer::bearer(&allow_token))
    } else {
        app
    }
}

async fn root() -> &'static str {
    "This is a server for tagmap data."
}

type ErrorResponse = (StatusCode, Json<Value>);

fn error_response(err: IndexError) -> ErrorResponse {
    let status = match err {
        IndexError::TagNotFound(_) | IndexError::AssociationNotFound(_) => StatusCode::NOT_FOUND,
        IndexError::UnknownEntityKind { .. } | IndexError::InvalidEntityId(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

fn tag_json(tag: &Tag) -> Value {
    json!({ "id": u64::from(tag.id()), "label": tag.label().as_str() })
}

fn association_json(association: &Association) -> Value {
    json!({
        "id": u64::from(association.id()),
        "tag_id": u64::from(association.tag()),
        "entity_id": u64::from(association.entity_id()),
    })
}

#[derive(Deserialize)]
struct CreateTagBody {
    label: String,
}

async fn create_tag(
    State(index): State<SharedIndex>,
    Json(body): Json<CreateTagBody>,
) -> Result<(StatusCode, Json<Value>), ErrorResponse> {
    let label = TagLabel::new(body.label)
        .map_err(|err| (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() }))))?;
    let mut index = index.write().await;
    let id = index.create_tag(label);
    info!("created tag {id}");
    let tag = index.get_tag(id).map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(tag_json(tag))))
}

async fn all_tags(State(index): State<SharedIndex>) -> Json<Value> {
    let index = index.read().await;
    Json(Value::Array(index.tags().iter().map(tag_json).collect()))
}

async fn tag_by_id(
    State(index): State<SharedIndex>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ErrorResponse> {
    let index = index.read().await;
    let tag = index.get_tag(TagId::from(id)).map_err(error_response)?;
    Ok(Json(tag_json(tag)))
}

async fn delete_tag(
    State(index): State<SharedIndex>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ErrorResponse> {
    let mut index = index.write().await;
    let cascaded = index.delete_tag(TagId::from(id)).map_err(error_response)?;
    info!("deleted tag {id} and {cascaded} attachments");
    Ok(Json(json!({ "deleted_attachments": cascaded })))
}

#[derive(Deserialize)]
struct AttachBody {
    tag_id: u64,
    kind: String,
    entity_id: u64,
}

async fn attach(
    State(index): State<SharedIndex>,
    Json(body): Json<AttachBody>,
) -> Result<(StatusCode, Json<Value>), ErrorResponse> {
    let mut index = index.write().await;
    let id = index
        .attach(TagId::from(body.tag_id), &body.kind, body.entity_id)
        .map_err(error_response)?;
    let association = index.association(id).map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(association_json(association))))
}

async fn detach(
    State(index): State<SharedIndex>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ErrorResponse> {
    let mut index = index.write().await;
    let removed = index
        .detach(AssociationId::from(id))
        .map_err(error_response)?;
    Ok(Json(association_json(&removed)))
}

async fn tags_for(
    State(index): State<SharedIndex>,
    Path((kind, entity_id)): Path<(String, u64)>,
) -> Result<Json<Value>, ErrorResponse> {
    let index = index.read().await;
    let tags = index.tags_for(&kind, entity_id).map_err(error_response)?;
    Ok(Json(Value::Array(
        tags.iter()
            .map(|(association, tag)| {
                json!({
                    "association_id": u64::from(association.id()),
                    "tag_id": u64::from(tag.id()),
                    "label": tag.label().as_str(),
                })
            })
            .collect(),
    )))
}

async fn entities_for(
    State(index): State<SharedIndex>,
    Path(tag_id): Path<u64>,
) -> Result<Json<Value>, ErrorResponse> {
    let index = index.read().await;
    let entities = index
        .entities_for(TagId::from(tag_id))
        .map_err(error_response)?;
    Ok(Json(Value::Array(
        entities
            .iter()
            .map(|(type_ref, entity_id)| {
                json!({
                    "kind": index.registry().name_of(*type_ref),
                    "entity_id": u64::from(*entity_id),
                })
            })
            .collect(),
    )))
}
