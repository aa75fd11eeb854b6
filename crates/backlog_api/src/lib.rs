//! Typed Backlog XML-RPC client crate used by the bridge backend.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod request;
pub mod response;
pub mod value;

pub use client::{BacklogClient, HttpTransport, Transport};
pub use config::BacklogConfig;
pub use dispatch::{dispatch, CallSpec, CALL_TABLE};
pub use error::{BacklogError, Result};
pub use models::{CallParams, Credentials, FilterSet, Record, RemoteCall};
pub use value::{Member, Value};
