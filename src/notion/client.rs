//! Typed resource operations on top of the request pipeline.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::time::{Sleeper, TokioSleeper};
use crate::transport::HttpClient;

use super::ids::{id_segment, path_segment};
use super::models::{
    AppendBlockChildrenPayload, Block, Comment, CreateCommentPayload, CreatePagePayload, Database,
    Page, Paginated, PropertyItem, QueryDatabasePayload, UpdatePagePayload, User,
};
use super::{ApiError, ApiRequest, RequestPipeline};

/// Notion API client: one method per endpoint.
///
/// Every method builds a fresh [`ApiRequest`], runs it through the
/// [`RequestPipeline`] (and therefore through its retry policy) and decodes
/// the response into a typed model. A response that does not fit the model
/// is reported as [`ApiError::Deserialization`].
///
/// Database, page and property ids may be given with or without dashes.
/// Every id is sent as one percent-encoded path segment.
#[derive(Debug)]
pub struct NotionClient<H, S = TokioSleeper> {
    pipeline: RequestPipeline<H, S>,
}

impl<H, S> NotionClient<H, S> {
    /// Wraps a configured pipeline.
    pub const fn new(pipeline: RequestPipeline<H, S>) -> Self {
        Self { pipeline }
    }

    /// The underlying pipeline.
    pub const fn pipeline(&self) -> &RequestPipeline<H, S> {
        &self.pipeline
    }
}

impl<H: HttpClient, S: Sleeper> NotionClient<H, S> {
    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let value = self.pipeline.execute(&request).await?;
        serde_json::from_value(value).map_err(ApiError::Deserialization)
    }

    /// Retrieves a database.
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` for an empty, `.` or `..` id, the pipeline's
    /// [`ApiError`], or `Deserialization` if the response is not a database.
    pub async fn get_database(&self, database_id: &str) -> Result<Database, ApiError> {
        self.call(ApiRequest::get(format!("databases/{}", id_segment(database_id)?)))
            .await
    }

    /// Queries a database. Without a payload the whole first page is returned.
    ///
    /// # Errors
    ///
    /// See [`NotionClient::get_database`].
    pub async fn query_database(
        &self,
        database_id: &str,
        payload: Option<&QueryDatabasePayload>,
    ) -> Result<Paginated<Page>, ApiError> {
        let mut request = ApiRequest::post(format!("databases/{}/query", id_segment(database_id)?));
        if let Some(payload) = payload {
            request = request.with_payload(to_payload(payload)?);
        }
        self.call(request).await
    }

    /// Creates a page.
    ///
    /// # Errors
    ///
    /// See [`NotionClient::get_database`].
    pub async fn create_page(&self, payload: &CreatePagePayload) -> Result<Page, ApiError> {
        self.call(ApiRequest::post("pages").with_payload(to_payload(payload)?))
            .await
    }

    /// Retrieves a page.
    ///
    /// # Errors
    ///
    /// See [`NotionClient::get_database`].
    pub async fn get_page(&self, page_id: &str) -> Result<Page, ApiError> {
        self.call(ApiRequest::get(format!("pages/{}", id_segment(page_id)?)))
            .await
    }

    /// Updates page properties, icon, cover or archive state.
    ///
    /// # Errors
    ///
    /// See [`NotionClient::get_database`].
    pub async fn update_page(
        &self,
        page_id: &str,
        payload: &UpdatePagePayload,
    ) -> Result<Page, ApiError> {
        self.call(
            ApiRequest::patch(format!("pages/{}", id_segment(page_id)?))
                .with_payload(to_payload(payload)?),
        )
        .await
    }

    /// Retrieves one property of a page (e.g. a `files` property).
    ///
    /// # Errors
    ///
    /// See [`NotionClient::get_database`].
    pub async fn get_page_property(
        &self,
        page_id: &str,
        property_id: &str,
    ) -> Result<PropertyItem, ApiError> {
        self.call(ApiRequest::get(format!(
            "pages/{}/properties/{}",
            id_segment(page_id)?,
            id_segment(property_id)?
        )))
        .await
    }

    /// Lists the children of a block (or page).
    ///
    /// # Errors
    ///
    /// See [`NotionClient::get_database`].
    pub async fn get_block_children(
        &self,
        block_id: &str,
        page_size: Option<u32>,
    ) -> Result<Paginated<Block>, ApiError> {
        let mut request = ApiRequest::get(format!("blocks/{}/children", path_segment(block_id)?));
        if let Some(size) = page_size {
            request = request.with_query("page_size", size);
        }
        self.call(request).await
    }

    /// Appends blocks to a block (or page).
    ///
    /// # Errors
    ///
    /// See [`NotionClient::get_database`].
    pub async fn append_block_children(
        &self,
        block_id: &str,
        payload: &AppendBlockChildrenPayload,
    ) -> Result<Paginated<Block>, ApiError> {
        self.call(
            ApiRequest::patch(format!("blocks/{}/children", path_segment(block_id)?))
                .with_payload(to_payload(payload)?),
        )
        .await
    }

    /// Lists the unresolved comments of a block or page.
    ///
    /// # Errors
    ///
    /// See [`NotionClient::get_database`].
    pub async fn list_comments(&self, block_id: &str) -> Result<Paginated<Comment>, ApiError> {
        self.call(ApiRequest::get("comments").with_query("block_id", block_id))
            .await
    }

    /// Creates a comment on a page or in an existing discussion.
    ///
    /// # Errors
    ///
    /// See [`NotionClient::get_database`].
    pub async fn create_comment(&self, payload: &CreateCommentPayload) -> Result<Comment, ApiError> {
        self.call(ApiRequest::post("comments").with_payload(to_payload(payload)?))
            .await
    }

    /// Lists workspace users.
    ///
    /// # Errors
    ///
    /// See [`NotionClient::get_database`].
    pub async fn list_users(&self) -> Result<Paginated<User>, ApiError> {
        self.call(ApiRequest::get("users")).await
    }

    /// Retrieves a user.
    ///
    /// # Errors
    ///
    /// See [`NotionClient::get_database`].
    pub async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.call(ApiRequest::get(format!("users/{}", path_segment(user_id)?)))
            .await
    }

    /// Retrieves the bot user of the integration token.
    ///
    /// # Errors
    ///
    /// See [`NotionClient::get_database`].
    pub async fn get_me(&self) -> Result<User, ApiError> {
        self.call(ApiRequest::get("users/me")).await
    }
}

fn to_payload<T: Serialize>(payload: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(payload).map_err(ApiError::Serialization)
}
