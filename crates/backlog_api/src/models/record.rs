use std::collections::BTreeMap;

/// Flat decoded result unit: field name to string value. Keys serialize in sorted order.
pub type Record = BTreeMap<String, String>;

/// Field vocabulary entry: member name plus whether it is read from the integer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub integer: bool,
}

impl FieldSpec {
    pub const fn int(name: &'static str) -> Self {
        Self { name, integer: true }
    }

    pub const fn text(name: &'static str) -> Self {
        Self { name, integer: false }
    }
}

pub const PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::int("id"),
    FieldSpec::text("name"),
    FieldSpec::text("key"),
    FieldSpec::text("url"),
];

/// Issue types, components, statuses and users share the same id/name vocabulary.
pub const ID_NAME_FIELDS: &[FieldSpec] = &[FieldSpec::int("id"), FieldSpec::text("name")];

pub const ISSUE_TEXT_FIELDS: &[&str] = &["key", "url", "summary", "created_on", "description"];
pub const ISSUE_NESTED_STRUCT_FIELDS: &[&str] = &["status", "assigner"];
pub const ISSUE_NESTED_ARRAY_FIELDS: &[&str] = &["components"];
