use crate::domain::model::ComponentSpec;
use crate::utils::error::Result;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::fmt;

/// Username/password pair forwarded untouched to the fetcher.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Retrieves the raw bytes behind a URL. Status handling is left to the caller.
pub trait Fetcher: Send + Sync {
    fn get(&self, url: &str, auth: Option<&BasicAuth>) -> Result<FetchResponse>;
}

pub trait Component {
    fn component_spec(&self) -> &ComponentSpec;

    fn name(&self) -> &str {
        &self.component_spec().name
    }

    fn execute(&self, arguments: &HashMap<String, serde_json::Value>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_debug_hides_password() {
        let rendered = format!("{:?}", BasicAuth::new("reader", "hunter2"));
        assert!(rendered.contains("reader"));
        assert!(!rendered.contains("hunter2"));
    }
}
