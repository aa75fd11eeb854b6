//! Optional multi-valued filters accepted by `backlog.findIssue`.

use serde::Deserialize;

use crate::value::{Member, Value};

/// Represents the optional `find_issue` filters as raw comma-separated identifier lists; empty means absent.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct FilterSet {
    #[serde(default)]
    pub issue_type: String,
    #[serde(default)]
    pub component: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub assigner: String,
}

impl FilterSet {
    /// Returns `(xml member name, source value)` pairs in wire order.
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("issueType", self.issue_type.as_str()),
            ("componentId", self.component.as_str()),
            ("statusId", self.status.as_str()),
            ("assignerId", self.assigner.as_str()),
        ]
    }

    /// Builds the struct members for every non-empty filter.
    pub fn members(&self) -> Vec<Member> {
        self.entries()
            .into_iter()
            .filter(|(_, source)| !source.is_empty())
            .map(|(name, source)| Member::new(name, id_array(source)))
            .collect()
    }
}

/// Splits a comma-separated list into an array of `<int>` values, tokens kept verbatim.
pub fn id_array(source: &str) -> Value {
    Value::Array(source.split(',').map(Value::int).collect())
}

/// Parameters consumed by the call table besides credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallParams {
    pub project: String,
    pub filters: FilterSet,
}

impl CallParams {
    pub fn for_project(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            filters: FilterSet::default(),
        }
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{id_array, FilterSet};
    use crate::value::Value;

    #[test]
    fn empty_filters_produce_no_members() {
        assert!(FilterSet::default().members().is_empty());
    }

    #[test]
    fn members_follow_wire_order() {
        let filters = FilterSet {
            issue_type: "1".into(),
            component: String::new(),
            status: "3,4".into(),
            assigner: "9".into(),
        };
        let names: Vec<String> = filters.members().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["issueType", "statusId", "assignerId"]);
    }

    #[test]
    fn tokens_are_not_trimmed() {
        assert_eq!(
            id_array("1, 2"),
            Value::Array(vec![Value::int("1"), Value::int(" 2")])
        );
    }
}
