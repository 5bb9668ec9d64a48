use crate::common::QueryParam;
use crate::errors::{CollectorError, CollectorResult, ErrorKind};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use secure_string::SecureString;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Blocking HTTP connection to the collections API.
///
/// # Purpose
/// Issues GET, POST and DELETE requests carrying the account credential and
/// returns the response body as text. Any response outside the 2xx range is
/// turned into a `RemoteError` carrying the status code; failures that never
/// produced a response become `TransportError`.
///
/// # Characteristics
/// - **Blocking**: every call waits for the response or the configured timeout
/// - **No retries**: a failed call surfaces immediately to the caller
/// - **Credential**: HTTP Basic, user name = API key, empty password
/// - **Cloneable**: clones share the underlying connection pool
#[derive(Clone)]
pub struct HttpConnection {
    agent: ureq::Agent,
    authorization: Option<Arc<SecureString>>,
}

impl HttpConnection {
    /// Creates a connection authenticating as `username` / `password`.
    ///
    /// An empty user name sends no `Authorization` header at all.
    pub fn new(username: &str, password: &str, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let authorization = if username.is_empty() {
            None
        } else {
            let token = STANDARD.encode(format!("{}:{}", username, password));
            Some(Arc::new(SecureString::from(format!("Basic {}", token))))
        };

        HttpConnection {
            agent: builder.build(),
            authorization,
        }
    }

    /// Issues a GET with `params` appended as the query string.
    pub fn get(&self, url: &str, params: &[QueryParam]) -> CollectorResult<String> {
        let mut request = self.prepare("GET", url);
        for (name, value) in params {
            request = request.query(name, value);
        }
        self.send(request, None)
    }

    /// Issues a POST with `body` as the request payload.
    pub fn post(&self, url: &str, body: &str) -> CollectorResult<String> {
        let request = self
            .prepare("POST", url)
            .set("Content-Type", "application/x-ndjson");
        self.send(request, Some(body))
    }

    /// Issues a DELETE on `url`.
    pub fn delete(&self, url: &str) -> CollectorResult<String> {
        let request = self.prepare("DELETE", url);
        self.send(request, None)
    }

    fn prepare(&self, method: &str, url: &str) -> ureq::Request {
        let request = self.agent.request(method, url);
        match &self.authorization {
            Some(authorization) => request.set("Authorization", authorization.unsecure()),
            None => request,
        }
    }

    fn send(&self, request: ureq::Request, body: Option<&str>) -> CollectorResult<String> {
        let method = request.method().to_string();
        let url = request.url().to_string();

        let result = match body {
            Some(body) => request.send_string(body),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                let status = response.status();
                if !(200..300).contains(&status) {
                    log::error!("{} {} returned unhandled status {}", method, url, status);
                    return Err(CollectorError::new(
                        &format!("Server returned unhandled response code: {}", status),
                        ErrorKind::RemoteError(status),
                    ));
                }
                response.into_string().map_err(|err| {
                    log::error!("Failed to read response body of {} {}: {}", method, url, err);
                    CollectorError::new_with_cause(
                        "Failed to read response body",
                        ErrorKind::TransportError,
                        err.into(),
                    )
                })
            }
            Err(ureq::Error::Status(status, _)) => {
                log::error!("{} {} returned unhandled status {}", method, url, status);
                Err(CollectorError::new(
                    &format!("Server returned unhandled response code: {}", status),
                    ErrorKind::RemoteError(status),
                ))
            }
            Err(ureq::Error::Transport(transport)) => {
                log::error!("{} {} failed: {}", method, url, transport);
                Err(CollectorError::new(
                    &format!("Request failed: {}", transport),
                    ErrorKind::TransportError,
                ))
            }
        }
    }
}

impl Debug for HttpConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnection")
            .field("authenticated", &self.authorization.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization_header() {
        let connection = HttpConnection::new("apikey", "", None);
        let authorization = connection.authorization.unwrap();
        // base64("apikey:")
        assert_eq!(authorization.unsecure(), "Basic YXBpa2V5Og==");
    }

    #[test]
    fn test_no_authorization_without_username() {
        let connection = HttpConnection::new("", "", Some(Duration::from_secs(1)));
        assert!(connection.authorization.is_none());
    }

    #[test]
    fn test_debug_hides_credential() {
        let connection = HttpConnection::new("secret-key", "", None);
        let debug = format!("{:?}", connection);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("authenticated: true"));
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let connection = HttpConnection::new("", "", Some(Duration::from_millis(500)));
        // nothing listens on the discard port
        let err = connection.get("http://127.0.0.1:9/", &[]).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TransportError);
    }
}
