//! Response wrapper variants
//!
//! Three façades share one underlying call:
//!
//! - **Parsed** — the default; the resource façade decodes the body and
//!   returns a [`TypedModel`](crate::codec::TypedModel) directly.
//! - **Raw** — [`RawResponse`]: status, headers and the undecoded body, with
//!   a lazy [`parse`](RawResponse::parse) for callers that decide later.
//! - **Streaming** — [`StreamingResponse`]: the body is consumed chunk by
//!   chunk without buffering; the connection closes exactly once on every
//!   exit path, observable through a [`CloseSignal`].

mod raw;
mod streaming;

#[cfg(test)]
mod tests;

pub use raw::RawResponse;
pub use streaming::{BodyStream, CloseSignal, StreamingResponse};
