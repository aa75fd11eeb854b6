//! Response decoding: envelope parsing plus the per-call projections into flat records.
//!
//! The envelope must parse; anything past it is lenient. A record whose members
//! do not have the expected shape keeps empty or missing fields instead of
//! failing the whole call.

use crate::error::{BacklogError, Result};
use crate::models::{
    FieldSpec, Record, RemoteCall, ID_NAME_FIELDS, ISSUE_NESTED_ARRAY_FIELDS,
    ISSUE_NESTED_STRUCT_FIELDS, ISSUE_TEXT_FIELDS, PROJECT_FIELDS,
};
use crate::value::{Member, Token, Value, XmlCursor};

/// Parses a `methodResponse` body into its single result value, or the remote fault as an error.
pub fn parse_response(bytes: &[u8]) -> Result<Value> {
    let mut cursor = XmlCursor::new(bytes);
    cursor.expect_open("methodResponse")?;
    match cursor.next_tag()? {
        Token::Open(tag) if tag == "params" => {
            cursor.expect_open("param")?;
            cursor.expect_open("value")?;
            let value = cursor.value_body()?;
            cursor.expect_close("param")?;
            cursor.expect_close("params")?;
            cursor.expect_close("methodResponse")?;
            Ok(value)
        }
        Token::Open(tag) if tag == "fault" => {
            cursor.expect_open("value")?;
            let fault = cursor.value_body()?;
            Err(fault_error(&fault))
        }
        other => Err(BacklogError::malformed(format!(
            "expected <params> or <fault> in methodResponse, found {other:?}"
        ))),
    }
}

fn fault_error(fault: &Value) -> BacklogError {
    let code = fault
        .member("faultCode")
        .and_then(|value| value.as_int().or_else(|| value.as_text()))
        .unwrap_or_default()
        .to_string();
    let message = fault
        .member("faultString")
        .and_then(Value::as_text)
        .unwrap_or_default()
        .to_string();
    BacklogError::Fault { code, message }
}

/// Decodes a response for `call` into records in source order.
pub fn decode(call: RemoteCall, bytes: &[u8]) -> Result<Vec<Record>> {
    let value = parse_response(bytes)?;
    Ok(match call {
        RemoteCall::GetProjects => project_flat(&value, PROJECT_FIELDS),
        RemoteCall::FindIssue => project_issues(&value),
        RemoteCall::GetIssueTypes
        | RemoteCall::GetComponents
        | RemoteCall::GetStatuses
        | RemoteCall::GetUsers => project_flat(&value, ID_NAME_FIELDS),
    })
}

/// Struct entries of a top-level array; entries of any other shape are skipped.
fn entries(value: &Value) -> impl Iterator<Item = &[Member]> {
    value.as_array().unwrap_or_default().iter().filter_map(Value::as_struct)
}

/// Matches each struct member against a flat vocabulary.
pub fn project_flat(value: &Value, fields: &[FieldSpec]) -> Vec<Record> {
    entries(value)
        .map(|members| {
            let mut record = Record::new();
            for member in members {
                let Some(field) = fields.iter().find(|field| field.name == member.name) else {
                    continue;
                };
                let slot = if field.integer {
                    member.value.as_int()
                } else {
                    member.value.as_text()
                };
                record.insert(field.name.to_string(), slot.unwrap_or_default().to_string());
            }
            record
        })
        .collect()
}

/// Issue projection: flat text members plus `name` pulled out of nested structs and struct arrays.
pub fn project_issues(value: &Value) -> Vec<Record> {
    entries(value)
        .map(|members| {
            let mut record = Record::new();
            for member in members {
                let name = member.name.as_str();
                if ISSUE_TEXT_FIELDS.contains(&name) {
                    let text = member.value.as_text().unwrap_or_default();
                    record.insert(name.to_string(), text.to_string());
                } else if ISSUE_NESTED_STRUCT_FIELDS.contains(&name) {
                    if let Some(nested) = nested_name(&member.value) {
                        record.insert(name.to_string(), nested.to_string());
                    }
                } else if ISSUE_NESTED_ARRAY_FIELDS.contains(&name) {
                    // only the last entry's name survives
                    let last = member
                        .value
                        .as_array()
                        .unwrap_or_default()
                        .iter()
                        .filter_map(nested_name)
                        .last();
                    if let Some(nested) = last {
                        record.insert(name.to_string(), nested.to_string());
                    }
                }
            }
            record
        })
        .collect()
}

fn nested_name(value: &Value) -> Option<&str> {
    value
        .member("name")
        .map(|name| name.as_text().unwrap_or_default())
}
