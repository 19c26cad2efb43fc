//! Streaming response wrapper
//!
//! The body is never buffered by the runtime; chunks flow straight from the
//! connection to the caller. The connection is released when the stream
//! completes, errors, or is dropped early, and a shared [`CloseSignal`] flips
//! at that moment so callers (and tests) can observe the release.

use crate::codec::{self, TypedModel};
use crate::error::{Error, Result};
use crate::pagination::extract_path;
use crate::schema::SchemaRegistry;
use crate::types::JsonValue;
use bytes::{Bytes, BytesMut};
use futures::stream::{BoxStream, Stream, StreamExt};
use pin_project_lite::pin_project;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

// ============================================================================
// Close Signal
// ============================================================================

/// Observable handle for the connection-released flag
#[derive(Debug, Clone)]
pub struct CloseSignal(Arc<AtomicBool>);

impl CloseSignal {
    /// Whether the underlying body stream has been released
    pub fn is_closed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Body Stream
// ============================================================================

pin_project! {
    /// Chunked body stream. The close flag flips when the stream is drained,
    /// hits an error, or is dropped mid-stream; dropping the stream is what
    /// actually returns the connection to the pool.
    pub struct BodyStream {
        #[pin]
        inner: BoxStream<'static, reqwest::Result<Bytes>>,
        closed: Arc<AtomicBool>,
    }

    impl PinnedDrop for BodyStream {
        fn drop(this: Pin<&mut Self>) {
            this.closed.store(true, Ordering::SeqCst);
        }
    }
}

impl Stream for BodyStream {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        match this.inner.poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => Poll::Ready(Some(Ok(chunk))),
            Poll::Ready(Some(Err(e))) => {
                this.closed.store(true, Ordering::SeqCst);
                Poll::Ready(Some(Err(Error::Transport(e))))
            }
            Poll::Ready(None) => {
                this.closed.store(true, Ordering::SeqCst);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

// ============================================================================
// Streaming Response
// ============================================================================

/// A response whose body is consumed incrementally
pub struct StreamingResponse {
    status: StatusCode,
    headers: HeaderMap,
    stream: BodyStream,
    closed: Arc<AtomicBool>,
    registry: Arc<SchemaRegistry>,
    model: Option<String>,
    result_path: Option<String>,
}

impl std::fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl StreamingResponse {
    pub(crate) fn new(
        response: reqwest::Response,
        registry: Arc<SchemaRegistry>,
        model: Option<String>,
        result_path: Option<String>,
    ) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let closed = Arc::new(AtomicBool::new(false));
        let stream = BodyStream {
            inner: response.bytes_stream().boxed(),
            closed: closed.clone(),
        };

        Self {
            status,
            headers,
            stream,
            closed,
            registry,
            model,
            result_path,
        }
    }

    /// HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Handle for observing when the body stream is released
    pub fn close_signal(&self) -> CloseSignal {
        CloseSignal(self.closed.clone())
    }

    /// Next body chunk, or `None` once the body is exhausted
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        self.stream.next().await.transpose()
    }

    /// Consume the wrapper, keeping only the body stream
    pub fn into_stream(self) -> BodyStream {
        self.stream
    }

    /// Drain the remaining body into one buffer
    pub async fn collect(mut self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.chunk().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }

    /// Non-streaming fallback: drain the body, then decode it against the
    /// operation's response model, drilling through the operation's result
    /// path so the outcome matches the parsed variant of the same call.
    pub async fn collect_parse(self) -> Result<TypedModel> {
        let model = self
            .model
            .clone()
            .ok_or_else(|| Error::config("operation declares no response model"))?;
        let registry = self.registry.clone();
        let result_path = self.result_path.clone();
        let body = self.collect().await?;

        let json: JsonValue = serde_json::from_slice(&body)?;
        let payload = match &result_path {
            Some(path) => extract_path(&json, path)
                .ok_or_else(|| Error::decode(path.clone(), "result path not found in response"))?,
            None => &json,
        };
        codec::decode(&registry, &model, payload)
    }
}
