use serde::Deserialize;

/// Represents the per-request Backlog account: space name plus login id and password used for Basic Auth.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(default)]
    pub space: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub pass: String,
}

impl Credentials {
    pub fn new(space: impl Into<String>, id: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            id: id.into(),
            pass: pass.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.space.is_empty() && !self.id.is_empty() && !self.pass.is_empty()
    }
}
