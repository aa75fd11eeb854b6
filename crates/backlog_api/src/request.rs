//! Request composition for the fixed set of Backlog XML-RPC method calls.

use quick_xml::events::{BytesDecl, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::models::{CallParams, RemoteCall};
use crate::value::{write_element, write_error, write_text_element, Member, Value};

/// Represents an XML-RPC `methodCall` as a value tree, serialized once into the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method_name: String,
    pub params: Vec<Value>,
}

impl MethodCall {
    pub fn new(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, value: Value) -> Self {
        self.params.push(value);
        self
    }

    /// Serializes the call with an XML declaration and no insignificant whitespace.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(write_error)?;
        write_element(&mut writer, "methodCall", |writer| {
            write_text_element(writer, "methodName", &self.method_name)?;
            write_element(writer, "params", |writer| {
                for param in &self.params {
                    write_element(writer, "param", |writer| param.write_to(writer))?;
                }
                Ok(())
            })
        })?;
        let body = String::from_utf8(writer.into_inner()).map_err(write_error)?;
        Ok(strip_framing_whitespace(&body))
    }
}

/// Removes every newline and tab from a composed body.
pub fn strip_framing_whitespace(body: &str) -> String {
    body.chars().filter(|ch| *ch != '\n' && *ch != '\t').collect()
}

/// `backlog.getProjects` and `backlog.getStatuses` take no parameters.
pub fn compose_without_params(call: RemoteCall, _params: &CallParams) -> Result<String> {
    MethodCall::new(call.method_name()).to_xml()
}

/// Calls scoped to a project take its id as a single positional `<int>`.
pub fn compose_project_scoped(call: RemoteCall, params: &CallParams) -> Result<String> {
    MethodCall::new(call.method_name())
        .with_param(Value::int(params.project.as_str()))
        .to_xml()
}

/// `backlog.findIssue` takes one struct: the mandatory `projectId` followed by each present filter.
pub fn compose_find_issue(call: RemoteCall, params: &CallParams) -> Result<String> {
    let mut members = vec![Member::new("projectId", Value::int(params.project.as_str()))];
    members.extend(params.filters.members());
    MethodCall::new(call.method_name())
        .with_param(Value::Struct(members))
        .to_xml()
}

#[cfg(test)]
mod tests {
    use super::{compose_find_issue, compose_project_scoped, compose_without_params, strip_framing_whitespace};
    use crate::models::{CallParams, FilterSet, RemoteCall};
    use crate::value::{parse_value, Value};

    const DECL: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

    fn issue_params(issue_type: &str) -> CallParams {
        CallParams::for_project("12").with_filters(FilterSet {
            issue_type: issue_type.to_string(),
            ..FilterSet::default()
        })
    }

    /// Pulls the `<value>` of a named member back out of a composed body.
    fn member_value(body: &str, name: &str) -> Option<Value> {
        let marker = format!("<name>{name}</name>");
        let start = body.find(&marker)? + marker.len();
        let end = start + body[start..].find("</member>")?;
        parse_value(body[start..end].as_bytes()).ok()
    }

    #[test]
    fn get_projects_has_empty_params() {
        let body = compose_without_params(RemoteCall::GetProjects, &CallParams::default()).unwrap();
        assert_eq!(
            body,
            format!("{DECL}<methodCall><methodName>backlog.getProjects</methodName><params></params></methodCall>")
        );
    }

    #[test]
    fn project_scoped_call_sends_positional_int() {
        let body = compose_project_scoped(RemoteCall::GetComponents, &CallParams::for_project("7")).unwrap();
        assert!(body.contains("<methodName>backlog.getComponents</methodName>"));
        assert!(body.contains("<params><param><value><int>7</int></value></param></params>"));
    }

    #[test]
    fn find_issue_expands_issue_type_list_in_order() {
        let body = compose_find_issue(RemoteCall::FindIssue, &issue_params("1,2")).unwrap();
        assert!(body.contains(
            "<member><name>issueType</name><value><array><data>\
             <value><int>1</int></value><value><int>2</int></value>\
             </data></array></value></member>"
        ));
        assert_eq!(body.matches("<value><int>").count(), 3);
    }

    #[test]
    fn find_issue_omits_empty_filters() {
        let body = compose_find_issue(RemoteCall::FindIssue, &issue_params("")).unwrap();
        assert!(!body.contains("issueType"));
        assert!(!body.contains("<array>"));
        assert!(body.contains("<member><name>projectId</name><value><int>12</int></value></member>"));
    }

    #[test]
    fn find_issue_places_filters_after_project_id() {
        let params = CallParams::for_project("1").with_filters(FilterSet {
            issue_type: "1".into(),
            component: "2".into(),
            status: "3".into(),
            assigner: "4".into(),
        });
        let body = compose_find_issue(RemoteCall::FindIssue, &params).unwrap();
        let positions: Vec<usize> = ["projectId", "issueType", "componentId", "statusId", "assignerId"]
            .iter()
            .map(|name| body.find(&format!("<name>{name}</name>")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn filter_list_survives_encode_then_parse() {
        let params = CallParams::for_project("5").with_filters(FilterSet {
            status: "4,1,3".into(),
            ..FilterSet::default()
        });
        let body = compose_find_issue(RemoteCall::FindIssue, &params).unwrap();
        let value = member_value(&body, "statusId").unwrap();
        let ids: Vec<&str> = value.as_array().unwrap().iter().filter_map(Value::as_int).collect();
        assert_eq!(ids, vec!["4", "1", "3"]);
    }

    #[test]
    fn metacharacters_in_identifiers_are_escaped() {
        let body = compose_project_scoped(RemoteCall::GetIssueTypes, &CallParams::for_project("1</int>")).unwrap();
        assert!(body.contains("<int>1&lt;/int&gt;</int>"));
    }

    #[test]
    fn strip_removes_only_newlines_and_tabs() {
        assert_eq!(strip_framing_whitespace("\t<a>\n x y</a>\n"), "<a> x y</a>");
    }
}
