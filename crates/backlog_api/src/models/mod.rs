mod credentials;
mod filters;
mod record;
mod remote_call;

pub use credentials::Credentials;
pub use filters::{id_array, CallParams, FilterSet};
pub use record::{
    FieldSpec, Record, ID_NAME_FIELDS, ISSUE_NESTED_ARRAY_FIELDS, ISSUE_NESTED_STRUCT_FIELDS,
    ISSUE_TEXT_FIELDS, PROJECT_FIELDS,
};
pub use remote_call::RemoteCall;
