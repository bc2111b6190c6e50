use crate::app::ports::{DataSource, RawTable};
use crate::error::LoadError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Published CSV fetched over HTTP(S).
pub struct RemoteCsvSource {
    url: String,
    client: reqwest::Client,
}

impl RemoteCsvSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DataSource for RemoteCsvSource {
    fn mode(&self) -> &'static str {
        "remote"
    }

    fn describe(&self) -> String {
        self.url.clone()
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<RawTable, LoadError> {
        let fetch_err = |source| LoadError::Fetch {
            url: self.url.clone(),
            source,
        };

        let resp = self.client.get(&self.url).send().await.map_err(fetch_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        let bytes = resp.bytes().await.map_err(fetch_err)?.to_vec();
        debug!(status = status.as_u16(), bytes = bytes.len(), "Fetched remote table");

        Ok(RawTable {
            origin: self.url.clone(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error() {
        // port 9 on localhost is not expected to serve HTTP
        let source = RemoteCsvSource::new("http://127.0.0.1:9/mnd.csv");
        let err = source.fetch().await.unwrap_err();
        assert_eq!(err.kind(), "fetch");
        assert!(err.to_string().contains("http://127.0.0.1:9/mnd.csv"));
    }

    #[tokio::test]
    async fn non_success_status_is_http_status_error() {
        use axum::{http::StatusCode, routing::get, Router};

        let app = Router::new().route("/mnd.csv", get(|| async { StatusCode::NOT_FOUND }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let source = RemoteCsvSource::new(format!("http://{}/mnd.csv", addr));
        let err = source.fetch().await.unwrap_err();
        assert_eq!(err.kind(), "http_status");
        assert!(matches!(err, LoadError::HttpStatus { status: 404, .. }));
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[tokio::test]
    async fn malformed_url_is_a_fetch_error() {
        let source = RemoteCsvSource::new("not a url");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
    }
}
