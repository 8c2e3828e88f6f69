use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{ClientSettings, ComparePayload, CompareResponse, DownloadToken, ProfilesMap, TableFile};

/// Failures at the HTTP boundary, before they are mapped to a workflow error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Transport(String),

    /// Non-success status; `body` is the response text, verbatim
    #[error("{body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl BackendError {
    /// True when the backend was never reached or never answered.
    pub fn is_transport(&self) -> bool {
        matches!(self, BackendError::Transport(_) | BackendError::InvalidUrl(_))
    }
}

/// Contract with the comparison service.
///
/// Column inference, the comparison itself and profile persistence all live
/// behind this trait; the workflow only orchestrates calls and keeps state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReconBackend: Send + Sync {
    /// `POST columns` with one file; returns the header row as discovered.
    async fn discover_columns(&self, file: &TableFile) -> Result<Vec<String>, BackendError>;

    /// `POST compare` with both files and the JSON-encoded configuration.
    async fn compare(
        &self,
        first: &TableFile,
        second: &TableFile,
        config: &ComparePayload,
    ) -> Result<CompareResponse, BackendError>;

    /// `GET download/{token}`; returns the artifact bytes.
    async fn download(&self, token: &DownloadToken) -> Result<Vec<u8>, BackendError>;

    /// `GET profiles`
    async fn list_profiles(&self) -> Result<ProfilesMap, BackendError>;

    /// `POST profiles/{name}`; upserts.
    async fn save_profile(&self, name: &str, config: &ComparePayload) -> Result<(), BackendError>;

    /// `DELETE profiles/{name}`
    async fn delete_profile(&self, name: &str) -> Result<(), BackendError>;
}

#[derive(Deserialize)]
struct ColumnsResponse {
    columns: Vec<String>,
}

/// [`ReconBackend`] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    http: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(settings: &ClientSettings) -> Result<Self, BackendError> {
        let base = Url::parse(&settings.backend_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {e}", settings.backend_url)))?;
        if base.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(settings.backend_url.clone()));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(format!("finrecon/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        tracing::debug!("HTTP backend configured for {}", base);
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn file_part(file: &TableFile) -> Part {
        Part::bytes(file.contents().to_vec()).file_name(file.name().to_string())
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        tracing::debug!("Backend answered {}: {}", status, body);
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn parse_json<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, BackendError> {
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl ReconBackend for HttpBackend {
    async fn discover_columns(&self, file: &TableFile) -> Result<Vec<String>, BackendError> {
        let url = self.endpoint(&["columns"])?;
        let form = Form::new().part("file", Self::file_part(file));

        let response = Self::send(self.http.post(url).multipart(form)).await?;
        let body: ColumnsResponse = Self::parse_json(response).await?;
        Ok(body.columns)
    }

    async fn compare(
        &self,
        first: &TableFile,
        second: &TableFile,
        config: &ComparePayload,
    ) -> Result<CompareResponse, BackendError> {
        let url = self.endpoint(&["compare"])?;
        let config_json =
            serde_json::to_string(config).map_err(|e| BackendError::Malformed(e.to_string()))?;
        let form = Form::new()
            .part("first_file", Self::file_part(first))
            .part("second_file", Self::file_part(second))
            .text("config", config_json);

        let response = Self::send(self.http.post(url).multipart(form)).await?;
        Self::parse_json(response).await
    }

    async fn download(&self, token: &DownloadToken) -> Result<Vec<u8>, BackendError> {
        let url = self.endpoint(&["download", token.as_str()])?;
        let response = Self::send(self.http.get(url)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn list_profiles(&self) -> Result<ProfilesMap, BackendError> {
        let url = self.endpoint(&["profiles"])?;
        let response = Self::send(self.http.get(url)).await?;
        Self::parse_json(response).await
    }

    async fn save_profile(&self, name: &str, config: &ComparePayload) -> Result<(), BackendError> {
        let url = self.endpoint(&["profiles", name])?;
        Self::send(self.http.post(url).json(config)).await?;
        Ok(())
    }

    async fn delete_profile(&self, name: &str) -> Result<(), BackendError> {
        let url = self.endpoint(&["profiles", name])?;
        Self::send(self.http.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn backend_at(url: &str) -> HttpBackend {
        let settings = ClientSettings {
            backend_url: url.to_string(),
            ..ClientSettings::default()
        };
        HttpBackend::new(&settings).unwrap()
    }

    /// Serve a single canned HTTP response for a request without a body.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/api")
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let backend = backend_at("http://localhost:8000/api");
        let url = backend.endpoint(&["download", "abc-123"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/download/abc-123");
    }

    #[test]
    fn test_endpoint_with_trailing_slash() {
        let backend = backend_at("http://localhost:8000/api/");
        let url = backend.endpoint(&["columns"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/columns");
    }

    #[test]
    fn test_profile_names_are_percent_encoded() {
        let backend = backend_at("http://localhost:8000/api");
        let url = backend
            .endpoint(&["profiles", "Monthly Vendor/Recon"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/profiles/Monthly%20Vendor%2FRecon"
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        let settings = ClientSettings {
            backend_url: "not a url".to_string(),
            ..ClientSettings::default()
        };
        assert!(matches!(
            HttpBackend::new(&settings),
            Err(BackendError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_list_profiles_parses_map() {
        let url = serve_once(
            "200 OK",
            r#"{"Monthly":{"match_keys_first":["ID"],"match_keys_second":["ID"],"compare_col_first":"Amount","compare_col_second":"Amt","tolerance_type":"None","tolerance_value":null}}"#,
        )
        .await;
        let profiles = backend_at(&url).list_profiles().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles["Monthly"].compare_col_second, "Amt");
    }

    #[tokio::test]
    async fn test_error_body_is_kept_verbatim() {
        let url = serve_once("404 Not Found", r#"{"detail":"Download not found or expired"}"#).await;
        let err = backend_at(&url)
            .download(&DownloadToken::new("missing"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BackendError::Status {
                status: 404,
                body: r#"{"detail":"Download not found or expired"}"#.to_string(),
            }
        );
        assert!(!err.is_transport());
    }
}
