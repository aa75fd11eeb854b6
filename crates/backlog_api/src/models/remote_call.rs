//! Identifiers of the remote procedures this client knows how to call.

/// Represents one supported Backlog XML-RPC operation, selected by exact method-name match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteCall {
    GetProjects,
    FindIssue,
    GetIssueTypes,
    GetComponents,
    GetStatuses,
    GetUsers,
}

impl RemoteCall {
    pub const ALL: [RemoteCall; 6] = [
        RemoteCall::GetProjects,
        RemoteCall::FindIssue,
        RemoteCall::GetIssueTypes,
        RemoteCall::GetComponents,
        RemoteCall::GetStatuses,
        RemoteCall::GetUsers,
    ];

    /// Inbound method name, e.g. `find_issue`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteCall::GetProjects => "get_projects",
            RemoteCall::FindIssue => "find_issue",
            RemoteCall::GetIssueTypes => "get_issue_types",
            RemoteCall::GetComponents => "get_components",
            RemoteCall::GetStatuses => "get_statuses",
            RemoteCall::GetUsers => "get_users",
        }
    }

    /// XML-RPC `methodName` sent to the remote server.
    pub fn method_name(&self) -> &'static str {
        match self {
            RemoteCall::GetProjects => "backlog.getProjects",
            RemoteCall::FindIssue => "backlog.findIssue",
            RemoteCall::GetIssueTypes => "backlog.getIssueTypes",
            RemoteCall::GetComponents => "backlog.getComponents",
            RemoteCall::GetStatuses => "backlog.getStatuses",
            RemoteCall::GetUsers => "backlog.getUsers",
        }
    }

    pub fn from_method(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|call| call.as_str() == method)
    }
}

#[cfg(test)]
mod tests {
    use super::RemoteCall;

    #[test]
    fn method_names_match_exactly() {
        for call in RemoteCall::ALL {
            assert_eq!(RemoteCall::from_method(call.as_str()), Some(call));
        }
        assert_eq!(RemoteCall::from_method("GET_PROJECTS"), None);
        assert_eq!(RemoteCall::from_method(" get_projects"), None);
        assert_eq!(RemoteCall::from_method("getProjects"), None);
    }
}
