//! Items API Client
//!
//! HTTP bindings to the remote items endpoints. The controller talks to the
//! `ItemsApi` trait so it can run against a mock in tests.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};

use crate::auth::Session;
use crate::config::{item_path, AppConfig};
use crate::error::FetchError;
use crate::models::{items_from_json, Item, ItemPayload};

pub type ApiResult<T> = Result<T, FetchError>;

/// Operation labels used in error messages (`GET /items failed: 500`)
pub fn list_operation() -> String {
    "GET /items".to_string()
}

pub fn upsert_operation() -> String {
    "PUT /items".to_string()
}

pub fn delete_operation(id: &str) -> String {
    format!("DELETE /items/{}", id)
}

/// Remote items collection
#[async_trait(?Send)]
pub trait ItemsApi: Send + Sync {
    /// Fetch the whole collection; a non-array body yields an empty list
    async fn list_items(&self, session: Option<&Session>) -> ApiResult<Vec<Item>>;

    /// Create (no `id`) or update (with `id`) one item
    async fn upsert_item(&self, payload: &ItemPayload, session: Option<&Session>) -> ApiResult<()>;

    async fn delete_item(&self, id: &str, session: Option<&Session>) -> ApiResult<()>;
}

/// `ItemsApi` over the browser fetch API
#[derive(Debug, Clone)]
pub struct HttpItemsApi {
    api_base: String,
}

impl HttpItemsApi {
    pub fn new(config: &AppConfig) -> Self {
        Self { api_base: config.api_base.clone() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

fn with_auth(builder: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
    match session {
        Some(session) => builder.header("Authorization", &session.authorization_header()),
        None => builder,
    }
}

/// Map transport errors and non-2xx statuses onto `FetchError`
fn checked(
    operation: &str,
    result: Result<Response, gloo_net::Error>,
) -> ApiResult<Response> {
    let response = result.map_err(|e| FetchError::network(operation, e))?;
    if response.ok() {
        Ok(response)
    } else {
        Err(FetchError::status(operation, response.status()))
    }
}

#[async_trait(?Send)]
impl ItemsApi for HttpItemsApi {
    async fn list_items(&self, session: Option<&Session>) -> ApiResult<Vec<Item>> {
        let operation = list_operation();
        let request = with_auth(Request::get(&self.url("/items")), session);
        let response = checked(&operation, request.send().await)?;
        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| FetchError::decode(&operation, e))?;
        Ok(items_from_json(body))
    }

    async fn upsert_item(&self, payload: &ItemPayload, session: Option<&Session>) -> ApiResult<()> {
        let operation = upsert_operation();
        let request = with_auth(Request::put(&self.url("/items")), session)
            .json(payload)
            .map_err(|e| FetchError::request(&operation, e))?;
        checked(&operation, request.send().await)?;
        Ok(())
    }

    async fn delete_item(&self, id: &str, session: Option<&Session>) -> ApiResult<()> {
        let operation = delete_operation(id);
        let request = with_auth(Request::delete(&self.url(&item_path(id))), session);
        checked(&operation, request.send().await)?;
        Ok(())
    }
}
