//! Routing from an inbound method name to the composer/decoder pair for that remote call.

use tracing::{debug, warn};

use crate::client::{BacklogClient, Transport};
use crate::config::is_valid_space;
use crate::error::Result;
use crate::models::{CallParams, Credentials, Record, RemoteCall};
use crate::request;
use crate::response;

pub type Composer = fn(RemoteCall, &CallParams) -> Result<String>;
pub type Decoder = fn(RemoteCall, &[u8]) -> Result<Vec<Record>>;

/// Strategy entry binding a remote call to how its request is built and its response projected.
#[derive(Clone, Copy)]
pub struct CallSpec {
    pub call: RemoteCall,
    pub compose: Composer,
    pub decode: Decoder,
}

impl std::fmt::Debug for CallSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallSpec").field("call", &self.call).finish()
    }
}

pub const CALL_TABLE: &[CallSpec] = &[
    CallSpec {
        call: RemoteCall::GetProjects,
        compose: request::compose_without_params,
        decode: response::decode,
    },
    CallSpec {
        call: RemoteCall::FindIssue,
        compose: request::compose_find_issue,
        decode: response::decode,
    },
    CallSpec {
        call: RemoteCall::GetIssueTypes,
        compose: request::compose_project_scoped,
        decode: response::decode,
    },
    CallSpec {
        call: RemoteCall::GetComponents,
        compose: request::compose_project_scoped,
        decode: response::decode,
    },
    CallSpec {
        call: RemoteCall::GetStatuses,
        compose: request::compose_without_params,
        decode: response::decode,
    },
    CallSpec {
        call: RemoteCall::GetUsers,
        compose: request::compose_project_scoped,
        decode: response::decode,
    },
];

pub fn lookup(method: &str) -> Option<&'static CallSpec> {
    let call = RemoteCall::from_method(method)?;
    CALL_TABLE.iter().find(|spec| spec.call == call)
}

/// Routes `method` to its remote call.
///
/// Returns `Ok(None)` without touching the transport when a credential or the
/// method is empty, the space cannot form a host name, or the method is not in
/// [`CALL_TABLE`]. Transport and decode failures are returned as errors.
pub async fn dispatch<T: Transport>(
    client: &BacklogClient<T>,
    credentials: &Credentials,
    method: &str,
    params: &CallParams,
) -> Result<Option<Vec<Record>>> {
    if !credentials.is_complete() || method.is_empty() {
        debug!("rejecting call with incomplete credentials or method");
        return Ok(None);
    }
    if !is_valid_space(&credentials.space) {
        warn!("rejecting call for space that is not a host label");
        return Ok(None);
    }
    let Some(spec) = lookup(method) else {
        debug!(method, "unknown method");
        return Ok(None);
    };
    client.call(spec, credentials, params).await.map(Some)
}
