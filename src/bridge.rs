//! Inbound DTO for the bridge and its conversion into API call inputs.
//!
//! Every field arrives as a named string; missing fields are empty.

use backlog_api::{CallParams, Credentials, FilterSet};
use serde::Deserialize;
use serde_json::{Map as JsonMap, Value};

/// Represents one inbound bridge request: account, method name, project and the raw `find_issue` filter lists.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct InboundRequest {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub method: String,
    pub project: String,
    #[serde(flatten)]
    pub filters: FilterSet,
}

impl InboundRequest {
    /// Builds a request from `(name, value)` pairs; unrecognized names are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, serde_json::Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: JsonMap<String, Value> = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), Value::String(value.into())))
            .collect();
        serde_json::from_value(Value::Object(map))
    }

    pub fn call_params(&self) -> CallParams {
        CallParams::for_project(self.project.clone()).with_filters(self.filters.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::InboundRequest;

    #[test]
    fn missing_fields_default_to_empty() {
        let request = InboundRequest::from_pairs([("method", "get_projects"), ("extra", "x")]).unwrap();
        assert_eq!(request.method, "get_projects");
        assert!(request.credentials.space.is_empty());
        assert!(!request.credentials.is_complete());
    }

    #[test]
    fn account_fields_fill_credentials() {
        let request =
            InboundRequest::from_pairs([("space", "demo"), ("id", "alice"), ("pass", "secret")]).unwrap();
        assert_eq!(request.credentials.space, "demo");
        assert_eq!(request.credentials.id, "alice");
        assert_eq!(request.credentials.pass, "secret");
        assert!(request.credentials.is_complete());
    }

    #[test]
    fn filters_are_copied_verbatim() {
        let request = InboundRequest::from_pairs([
            ("project", "10"),
            ("issue_type", "1,2"),
            ("component", ""),
            ("status", " 3"),
            ("assigner", "7"),
        ])
        .unwrap();
        let params = request.call_params();
        assert_eq!(params.project, "10");
        assert_eq!(params.filters.issue_type, "1,2");
        assert_eq!(params.filters.component, "");
        assert_eq!(params.filters.status, " 3");
        assert_eq!(params.filters.assigner, "7");
    }
}
