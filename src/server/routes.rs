//! Route handlers of the web facade.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::notion::NotionClient;
use crate::notion::models::{
    AppendBlockChildrenPayload, Block, Comment, CreateCommentPayload, CreatePagePayload, Database,
    Page, Paginated, PropertyItem, QueryDatabasePayload, UpdatePagePayload, User,
};
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::HttpClient;
use crate::webhook::{ChannelSink, WebhookError, WebhookGate};

use super::RouteError;

/// Shared state of all routes.
#[derive(Debug)]
pub struct AppState<H, S = TokioSleeper> {
    notion: NotionClient<H, S>,
    webhook: WebhookGate<ChannelSink>,
}

impl<H, S> AppState<H, S> {
    /// Bundles the Notion client and the webhook gate.
    pub const fn new(notion: NotionClient<H, S>, webhook: WebhookGate<ChannelSink>) -> Self {
        Self { notion, webhook }
    }

    /// The client used by resource routes.
    pub const fn notion(&self) -> &NotionClient<H, S> {
        &self.notion
    }

    /// The gate guarding `POST /webhooks`.
    pub const fn webhook(&self) -> &WebhookGate<ChannelSink> {
        &self.webhook
    }
}

type SharedState<H, S> = State<Arc<AppState<H, S>>>;
type RouteResult<T> = Result<Json<T>, RouteError>;

/// Builds the facade router.
pub fn router<H, S>(state: Arc<AppState<H, S>>) -> Router
where
    H: HttpClient + 'static,
    S: Sleeper + 'static,
{
    Router::new()
        .route("/databases/{database_id}", get(get_database::<H, S>))
        .route("/databases/{database_id}/query", post(query_database::<H, S>))
        .route("/pages", post(create_page::<H, S>))
        .route(
            "/pages/{page_id}",
            get(get_page::<H, S>).patch(update_page::<H, S>),
        )
        .route(
            "/blocks/{block_id}/children",
            get(get_block_children::<H, S>).patch(append_block_children::<H, S>),
        )
        .route(
            "/comments",
            get(list_comments::<H, S>).post(create_comment::<H, S>),
        )
        .route("/users", get(list_users::<H, S>))
        .route("/users/me", get(get_me::<H, S>))
        .route("/users/{user_id}", get(get_user::<H, S>))
        .route(
            "/files/pages/{page_id}/properties/{property_id}",
            get(get_file_property::<H, S>),
        )
        .route("/webhooks", post(receive_webhook::<H, S>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct PageSizeQuery {
    page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CommentsQuery {
    block_id: String,
}

async fn get_database<H: HttpClient, S: Sleeper>(
    State(state): SharedState<H, S>,
    Path(database_id): Path<String>,
) -> RouteResult<Database> {
    Ok(Json(state.notion.get_database(&database_id).await?))
}

/// An empty body queries without filters.
async fn query_database<H: HttpClient, S: Sleeper>(
    State(state): SharedState<H, S>,
    Path(database_id): Path<String>,
    body: Bytes,
) -> RouteResult<Paginated<Page>> {
    let payload: Option<QueryDatabasePayload> = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&body).map_err(RouteError::InvalidBody)?)
    };
    Ok(Json(
        state
            .notion
            .query_database(&database_id, payload.as_ref())
            .await?,
    ))
}

async fn create_page<H: HttpClient, S: Sleeper>(
    State(state): SharedState<H, S>,
    Json(payload): Json<CreatePagePayload>,
) -> Result<(StatusCode, Json<Page>), RouteError> {
    let page = state.notion.create_page(&payload).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

async fn get_page<H: HttpClient, S: Sleeper>(
    State(state): SharedState<H, S>,
    Path(page_id): Path<String>,
) -> RouteResult<Page> {
    Ok(Json(state.notion.get_page(&page_id).await?))
}

async fn update_page<H: HttpClient, S: Sleeper>(
    State(state): SharedState<H, S>,
    Path(page_id): Path<String>,
    Json(payload): Json<UpdatePagePayload>,
) -> RouteResult<Page> {
    Ok(Json(state.notion.update_page(&page_id, &payload).await?))
}

async fn get_block_children<H: HttpClient, S: Sleeper>(
    State(state): SharedState<H, S>,
    Path(block_id): Path<String>,
    Query(query): Query<PageSizeQuery>,
) -> RouteResult<Paginated<Block>> {
    Ok(Json(
        state
            .notion
            .get_block_children(&block_id, query.page_size)
            .await?,
    ))
}

async fn append_block_children<H: HttpClient, S: Sleeper>(
    State(state): SharedState<H, S>,
    Path(block_id): Path<String>,
    Json(payload): Json<AppendBlockChildrenPayload>,
) -> RouteResult<Paginated<Block>> {
    Ok(Json(
        state
            .notion
            .append_block_children(&block_id, &payload)
            .await?,
    ))
}

async fn list_comments<H: HttpClient, S: Sleeper>(
    State(state): SharedState<H, S>,
    Query(query): Query<CommentsQuery>,
) -> RouteResult<Paginated<Comment>> {
    Ok(Json(state.notion.list_comments(&query.block_id).await?))
}

async fn create_comment<H: HttpClient, S: Sleeper>(
    State(state): SharedState<H, S>,
    Json(payload): Json<CreateCommentPayload>,
) -> RouteResult<Comment> {
    Ok(Json(state.notion.create_comment(&payload).await?))
}

async fn list_users<H: HttpClient, S: Sleeper>(
    State(state): SharedState<H, S>,
) -> RouteResult<Paginated<User>> {
    Ok(Json(state.notion.list_users().await?))
}

async fn get_me<H: HttpClient, S: Sleeper>(State(state): SharedState<H, S>) -> RouteResult<User> {
    Ok(Json(state.notion.get_me().await?))
}

async fn get_user<H: HttpClient, S: Sleeper>(
    State(state): SharedState<H, S>,
    Path(user_id): Path<String>,
) -> RouteResult<User> {
    Ok(Json(state.notion.get_user(&user_id).await?))
}

async fn get_file_property<H: HttpClient, S: Sleeper>(
    State(state): SharedState<H, S>,
    Path((page_id, property_id)): Path<(String, String)>,
) -> RouteResult<PropertyItem> {
    Ok(Json(
        state
            .notion
            .get_page_property(&page_id, &property_id)
            .await?,
    ))
}

/// The raw body is taken as bytes: the signature covers it verbatim.
async fn receive_webhook<H, S>(
    State(state): SharedState<H, S>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), WebhookError> {
    state.webhook.receive(&headers, &body)?;
    Ok((StatusCode::ACCEPTED, Json(json!({"status": "received"}))))
}
