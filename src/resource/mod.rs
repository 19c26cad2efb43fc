//! Resource façade module
//!
//! Exposes remote operations as typed methods. A [`Resource`] validates path
//! parameters up front, merges options, drives the transport with the retry
//! policy, and decodes response bodies; [`RawResource`] and
//! [`StreamingResource`] are derived façades over the same request path.

mod facade;
mod types;


pub use facade::{RawResource, Resource, StreamingResource};
pub use types::{OperationDef, ResourceDef};
