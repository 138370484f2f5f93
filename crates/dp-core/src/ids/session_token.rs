use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Provisioning session correlation token.
/// Format: "{mode_tag}_{monotonic_millis}"
///
/// Advisory-unique only: uniqueness is guaranteed against the previously
/// issued token, not cryptographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn issue(mode_tag: &str, millis: i64) -> Self {
        Self(format!("{mode_tag}_{millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for SessionToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
