// src/handlers/feed.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::feed::{FeedIndexRequest, FeedItem, FeedKind, NewFeedItem, UpdateFeedItemRequest, parse_index},
    state::Feeds,
    utils::{body::JsonBody, gate::Admin, html::clean_html},
};

const INVALID_INDEX: &str = "invalid index";

/// Lists a feed in insertion order.
pub async fn list_items(
    State(feeds): State<Feeds>,
    kind: FeedKind,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(feeds.get(kind).snapshot().await))
}

/// Appends an item to a feed. Open to any client.
pub async fn add_item(
    State(feeds): State<Feeds>,
    kind: FeedKind,
    JsonBody(payload): JsonBody<NewFeedItem>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let item = FeedItem {
        title: clean_html(&payload.title),
        desc: clean_html(&payload.desc),
        user: payload.user,
        image: payload.image,
    };

    feeds
        .get(kind)
        .update(|items| {
            items.push(item);
            Ok::<_, AppError>(())
        })
        .await?;

    tracing::info!("Added item to {}", kind.as_str());

    Ok(Json(json!({ "ok": true })))
}

/// Removes the item at `index`.
/// Admin only.
pub async fn delete_item(
    State(feeds): State<Feeds>,
    kind: FeedKind,
    Admin(payload): Admin<FeedIndexRequest>,
) -> Result<impl IntoResponse, AppError> {
    let index = parse_index(payload.index.as_ref())
        .ok_or_else(|| AppError::BadRequest(INVALID_INDEX.to_string()))?;

    feeds
        .get(kind)
        .update(|items| {
            if index >= items.len() {
                return Err(AppError::BadRequest(INVALID_INDEX.to_string()));
            }
            items.remove(index);
            Ok(())
        })
        .await?;

    tracing::info!("Deleted item {} from {}", index, kind.as_str());

    Ok(Json(json!({ "ok": true })))
}

/// Edits the item at `index`. Fields absent from the payload keep their value.
/// Admin only.
pub async fn update_item(
    State(feeds): State<Feeds>,
    kind: FeedKind,
    Admin(payload): Admin<UpdateFeedItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let index = parse_index(payload.index.as_ref())
        .ok_or_else(|| AppError::BadRequest(INVALID_INDEX.to_string()))?;

    feeds
        .get(kind)
        .update(|items| {
            let item = items
                .get_mut(index)
                .ok_or_else(|| AppError::BadRequest(INVALID_INDEX.to_string()))?;

            if let Some(title) = payload.title {
                item.title = clean_html(&title);
            }
            if let Some(desc) = payload.desc {
                item.desc = clean_html(&desc);
            }
            if let Some(image) = payload.image {
                item.image = image;
            }
            Ok::<_, AppError>(())
        })
        .await?;

    tracing::info!("Updated item {} in {}", index, kind.as_str());

    Ok(Json(json!({ "ok": true })))
}
