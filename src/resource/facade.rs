//! Resource façade
//!
//! One façade per remote resource; one method call is one network round trip
//! (pagination excepted). Path parameters are validated before any request
//! is attempted, and HTTP error statuses come back as typed status errors
//! carrying the decoded error body when one is declared.

use super::types::{OperationDef, ResourceDef};
use crate::client::ClientCore;
use crate::codec::{self, TypedModel};
use crate::error::{Error, Result, StatusError};
use crate::options::{merge, EffectiveOptions, RequestOptions};
use crate::pagination::{extract_path, FetchedPage, Page, PageFetcher};
use crate::response::{RawResponse, StreamingResponse};
use crate::template;
use crate::transport::{execute_with_retry, retry_after};
use crate::types::{JsonValue, StringMap};
use async_trait::async_trait;
use reqwest::Response;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Resource
// ============================================================================

/// Typed façade over one remote resource.
///
/// Stateless across calls; clones share the underlying client core and are
/// safe to use from concurrent tasks.
#[derive(Clone)]
pub struct Resource {
    name: String,
    def: Arc<ResourceDef>,
    core: Arc<ClientCore>,
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("operations", &self.def.operation_names())
            .finish_non_exhaustive()
    }
}

impl Resource {
    pub(crate) fn new(name: impl Into<String>, def: Arc<ResourceDef>, core: Arc<ClientCore>) -> Self {
        Self {
            name: name.into(),
            def,
            core,
        }
    }

    /// Resource name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetch one record by its identifier
    pub async fn get(&self, id: impl Into<String>, opts: RequestOptions) -> Result<TypedModel> {
        let op = self.operation("get")?;
        let params = bind_single_param(op, id.into())?;
        self.dispatch(op, &params, opts).await
    }

    /// Create a record; the body comes from the options
    pub async fn create(&self, opts: RequestOptions) -> Result<TypedModel> {
        let op = self.operation("create")?;
        self.dispatch(op, &StringMap::new(), opts).await
    }

    /// Update one record by its identifier
    pub async fn update(&self, id: impl Into<String>, opts: RequestOptions) -> Result<TypedModel> {
        let op = self.operation("update")?;
        let params = bind_single_param(op, id.into())?;
        self.dispatch(op, &params, opts).await
    }

    /// Delete one record by its identifier
    pub async fn delete(&self, id: impl Into<String>, opts: RequestOptions) -> Result<TypedModel> {
        let op = self.operation("delete")?;
        let params = bind_single_param(op, id.into())?;
        self.dispatch(op, &params, opts).await
    }

    /// Invoke any declared operation with named path parameters
    pub async fn execute(
        &self,
        operation: &str,
        params: &StringMap,
        opts: RequestOptions,
    ) -> Result<TypedModel> {
        let op = self.operation(operation)?;
        self.dispatch(op, params, opts).await
    }

    /// List records, returning the first page of a paginated walk
    pub async fn list(&self, opts: RequestOptions) -> Result<Page> {
        self.list_with_params(&StringMap::new(), opts).await
    }

    /// List records under a parameterized path, e.g. records of one zone
    pub async fn list_with_params(
        &self,
        params: &StringMap,
        opts: RequestOptions,
    ) -> Result<Page> {
        let op = self.operation("list")?;
        let path = template::render_path(&op.path, params)?;

        let paginator = op.pagination.build();
        let fetcher = Arc::new(OperationFetcher {
            resource: self.clone(),
            op: op.clone(),
            path,
            opts,
        });

        Page::first(paginator, fetcher).await
    }

    /// Façade returning undecoded responses
    pub fn raw(&self) -> RawResource {
        RawResource {
            inner: self.clone(),
        }
    }

    /// Façade returning streaming responses
    pub fn streaming(&self) -> StreamingResource {
        StreamingResource {
            inner: self.clone(),
        }
    }

    fn operation(&self, name: &str) -> Result<&OperationDef> {
        self.def
            .get_operation(name)
            .ok_or_else(|| Error::OperationNotFound {
                resource: self.name.clone(),
                operation: name.to_string(),
            })
    }

    async fn dispatch(
        &self,
        op: &OperationDef,
        params: &StringMap,
        opts: RequestOptions,
    ) -> Result<TypedModel> {
        let (_, response) = self.send(op, params, &opts).await?;
        let body = response.bytes().await.map_err(Error::Transport)?;
        self.decode_result(op, &body)
    }

    /// Render the path, merge options, execute with retry, and classify the
    /// status. Path validation happens here, before any network activity.
    async fn send(
        &self,
        op: &OperationDef,
        params: &StringMap,
        opts: &RequestOptions,
    ) -> Result<(String, Response)> {
        let path = template::render_path(&op.path, params)?;
        let merged = self.effective_options(op, opts)?;

        debug!(resource = %self.name, method = ?op.method, %path, "dispatching operation");

        let response =
            execute_with_retry(&self.core.transport, &self.core.retry, op.method, &path, &merged)
                .await?;
        let response = self.check_status(&path, response).await?;
        Ok((path, response))
    }

    /// Merge defaults with per-call options; a body under a declared request
    /// model is encoded so model-space field names reach the wire correctly.
    fn effective_options(
        &self,
        op: &OperationDef,
        opts: &RequestOptions,
    ) -> Result<EffectiveOptions> {
        let mut merged = merge(&self.core.defaults, opts);

        if let Some(model) = &op.request_model {
            if let Some(body) = merged.body.take() {
                let typed = TypedModel::new(model.clone(), body);
                merged.body = Some(codec::encode(&self.core.registry, &typed)?);
            }
        }

        Ok(merged)
    }

    /// Pass 2xx responses through; map everything >= 300 to a status error
    /// with the decoded error body when an error model is declared.
    async fn check_status(&self, path: &str, response: Response) -> Result<Response> {
        let status = response.status().as_u16();
        if status < 300 {
            return Ok(response);
        }

        let seconds = retry_after(&response);
        let body = response.text().await.unwrap_or_default();

        let mut err = StatusError::new(status, path, body.as_str());
        if let Some(model) = &self.core.error_model {
            if let Ok(decoded) = codec::decode_bytes(&self.core.registry, model, body.as_bytes()) {
                err = err.with_decoded(decoded.into_inner());
            }
        }
        if let Some(seconds) = seconds {
            err = err.with_retry_after(seconds);
        }

        Err(err.into())
    }

    /// Decode a response body against the operation's response model.
    ///
    /// An empty body (204-style) yields a null-bodied model; an operation
    /// without a response model yields the untyped JSON.
    fn decode_result(&self, op: &OperationDef, body: &[u8]) -> Result<TypedModel> {
        let schema = op.response_model.clone().unwrap_or_default();
        if body.is_empty() {
            return Ok(TypedModel::new(schema, JsonValue::Null));
        }

        let json: JsonValue = serde_json::from_slice(body)?;
        let payload = match &op.result_path {
            Some(path) => extract_path(&json, path)
                .ok_or_else(|| Error::decode(path.clone(), "result path not found in response"))?,
            None => &json,
        };

        match &op.response_model {
            Some(model) => codec::decode(&self.core.registry, model, payload),
            None => Ok(TypedModel::new(schema, payload.clone())),
        }
    }
}

/// Bind a positional identifier to the operation's single path placeholder
fn bind_single_param(op: &OperationDef, value: String) -> Result<StringMap> {
    let names = op.path_params();
    match names.as_slice() {
        [name] => {
            let mut params = StringMap::new();
            params.insert(name.clone(), value);
            Ok(params)
        }
        [] => Err(Error::config(format!(
            "operation path '{}' takes no parameter",
            op.path
        ))),
        _ => Err(Error::config(format!(
            "operation path '{}' takes multiple parameters, use execute() with named parameters",
            op.path
        ))),
    }
}

// ============================================================================
// Page Fetching
// ============================================================================

/// Fetches one page of a list operation for the pagination walk
struct OperationFetcher {
    resource: Resource,
    op: OperationDef,
    path: String,
    opts: RequestOptions,
}

#[async_trait]
impl PageFetcher for OperationFetcher {
    async fn fetch_page(&self, params: StringMap, url: Option<String>) -> Result<FetchedPage> {
        let mut opts = self.opts.clone();
        opts.extra_query.extend(params);
        let merged = self.resource.effective_options(&self.op, &opts)?;

        let path = url.unwrap_or_else(|| self.path.clone());
        let core = &self.resource.core;
        let response =
            execute_with_retry(&core.transport, &core.retry, self.op.method, &path, &merged)
                .await?;
        let response = self.resource.check_status(&path, response).await?;

        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(Error::Transport)?;
        let body: JsonValue = serde_json::from_slice(&bytes)?;

        let records = match &self.op.records_path {
            Some(path) => extract_path(&body, path).ok_or_else(|| {
                Error::decode(path.clone(), "records path not found in list response")
            })?,
            None => &body,
        };
        let records = records.as_array().ok_or_else(|| {
            Error::decode(
                self.op.records_path.as_deref().unwrap_or("$"),
                "list records are not an array",
            )
        })?;

        let model = self.op.response_model.as_deref().ok_or_else(|| {
            Error::config("list operation declares no response model")
        })?;
        let items = records
            .iter()
            .map(|record| codec::decode(&core.registry, model, record))
            .collect::<Result<Vec<_>>>()?;

        Ok(FetchedPage {
            items,
            body,
            headers,
        })
    }
}

// ============================================================================
// Derived Façades
// ============================================================================

/// Façade variant returning buffered, undecoded responses
#[derive(Debug, Clone)]
pub struct RawResource {
    inner: Resource,
}

impl RawResource {
    /// Fetch one record, leaving the body undecoded
    pub async fn get(&self, id: impl Into<String>, opts: RequestOptions) -> Result<RawResponse> {
        let op = self.inner.operation("get")?;
        let params = bind_single_param(op, id.into())?;
        self.dispatch(op, &params, opts).await
    }

    /// Invoke any declared operation, leaving the body undecoded
    pub async fn execute(
        &self,
        operation: &str,
        params: &StringMap,
        opts: RequestOptions,
    ) -> Result<RawResponse> {
        let op = self.inner.operation(operation)?;
        self.dispatch(op, params, opts).await
    }

    async fn dispatch(
        &self,
        op: &OperationDef,
        params: &StringMap,
        opts: RequestOptions,
    ) -> Result<RawResponse> {
        let (_, response) = self.inner.send(op, params, &opts).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(Error::Transport)?;

        Ok(RawResponse::new(
            status,
            headers,
            body,
            self.inner.core.registry.clone(),
            op.response_model.clone(),
            op.result_path.clone(),
        ))
    }
}

/// Façade variant returning streaming responses
#[derive(Debug, Clone)]
pub struct StreamingResource {
    inner: Resource,
}

impl StreamingResource {
    /// Fetch one record as a streaming body
    pub async fn get(
        &self,
        id: impl Into<String>,
        opts: RequestOptions,
    ) -> Result<StreamingResponse> {
        let op = self.inner.operation("get")?;
        let params = bind_single_param(op, id.into())?;
        self.dispatch(op, &params, opts).await
    }

    /// Invoke any declared operation as a streaming body
    pub async fn execute(
        &self,
        operation: &str,
        params: &StringMap,
        opts: RequestOptions,
    ) -> Result<StreamingResponse> {
        let op = self.inner.operation(operation)?;
        self.dispatch(op, params, opts).await
    }

    async fn dispatch(
        &self,
        op: &OperationDef,
        params: &StringMap,
        opts: RequestOptions,
    ) -> Result<StreamingResponse> {
        let (_, response) = self.inner.send(op, params, &opts).await?;
        Ok(StreamingResponse::new(
            response,
            self.inner.core.registry.clone(),
            op.response_model.clone(),
            op.result_path.clone(),
        ))
    }
}
