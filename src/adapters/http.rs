use crate::domain::ports::{BasicAuth, FetchResponse, Fetcher};
use crate::utils::error::Result;
use reqwest::blocking::Client;

/// Blocking HTTP fetcher. No timeout or retry is configured beyond reqwest defaults.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str, auth: Option<&BasicAuth>) -> Result<FetchResponse> {
        tracing::debug!("Making GET request to: {}", url);

        let mut request = self.client.get(url);
        if let Some(auth) = auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = request.send()?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        let body = response.bytes()?.to_vec();
        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_get_returns_status_and_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/component.yaml");
            then.status(200).body("name: echo\n");
        });

        let response = HttpFetcher::new()
            .get(&server.url("/component.yaml"), None)
            .unwrap();

        mock.assert();
        assert!(response.status.is_success());
        assert_eq!(response.body, b"name: echo\n");
    }

    #[test]
    fn test_get_does_not_fail_on_error_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/missing.yaml");
            then.status(404);
        });

        let response = HttpFetcher::new()
            .get(&server.url("/missing.yaml"), None)
            .unwrap();

        mock.assert();
        assert_eq!(response.status, reqwest::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_get_sends_basic_auth() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/private.yaml")
                .header("Authorization", "Basic dXNlcjpzZWNyZXQ=");
            then.status(200).body("ok");
        });

        let auth = BasicAuth::new("user", "secret");
        let response = HttpFetcher::new()
            .get(&server.url("/private.yaml"), Some(&auth))
            .unwrap();

        mock.assert();
        assert_eq!(response.body, b"ok");
    }
}
