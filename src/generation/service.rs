/// Remote image service client
///
/// The service is a black box: one GET per image, the final prompt embedded
/// in the URL path, raw image bytes in the response body.

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::{GenerationError, Result};

/// Anything that can turn a prompt into encoded image bytes
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Fetch one image for the final (already varied) prompt text
    async fn fetch(&self, prompt: &str) -> Result<Vec<u8>>;
}

/// HTTP client for Pollinations-style `GET {base}/{prompt}` endpoints
#[derive(Debug, Clone)]
pub struct HttpImageService {
    client: Client,
    base_url: Url,
}

impl HttpImageService {
    /// Create a client with the configured base URL and per-request timeout
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.service_url.clone(),
        })
    }

    /// URL for one prompt; the prompt becomes a single escaped path segment
    pub fn request_url(&self, prompt: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(prompt);
        }
        url
    }
}

#[async_trait]
impl ImageService for HttpImageService {
    async fn fetch(&self, prompt: &str) -> Result<Vec<u8>> {
        let url = self.request_url(prompt);
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status));
        }

        let bytes = response.bytes().await?;
        debug!("Received {}KB", bytes.len() / 1024);
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::{Duration, Instant};

    fn service(base: &str) -> HttpImageService {
        let mut config = AppConfig::from_lookup(|_| None).unwrap();
        config.service_url = Url::parse(base).unwrap();
        HttpImageService::new(&config).unwrap()
    }

    /// Answer a single request on a local port with a canned HTTP response
    ///
    /// Returns the base URL to point the service at.
    fn serve_once(response: &'static [u8], delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            thread::sleep(delay);
            let _ = stream.write_all(response);
            let _ = stream.flush();
        });

        format!("http://{}/prompt/", addr)
    }

    fn local_service(base: &str, timeout_secs: &str) -> HttpImageService {
        let config = AppConfig::from_lookup(|key| match key {
            "IMAGE_CREATOR_SERVICE_URL" => Some(base.to_string()),
            "IMAGE_CREATOR_TIMEOUT_SECS" => Some(timeout_secs.to_string()),
            _ => None,
        })
        .unwrap();
        HttpImageService::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_server_error_is_a_failure() {
        let base = serve_once(
            b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Duration::ZERO,
        );
        let service = local_service(&base, "5");

        match service.fetch("castle").await {
            Err(GenerationError::Status(status)) => assert_eq!(status.as_u16(), 500),
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_returns_body_unchanged() {
        let base = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 3\r\nConnection: close\r\n\r\nabc",
            Duration::ZERO,
        );
        let service = local_service(&base, "5");

        let body = service.fetch("a red fox in snow").await.unwrap();
        assert_eq!(body, b"abc".to_vec());
    }

    #[tokio::test]
    async fn test_stalled_server_times_out() {
        let base = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\nConnection: close\r\n\r\nabc",
            Duration::from_secs(3),
        );
        let service = local_service(&base, "1");

        let started = Instant::now();
        let result = service.fetch("castle").await;

        assert!(matches!(result, Err(GenerationError::Network(_))), "got {:?}", result);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_prompt_is_one_escaped_segment() {
        let service = service("https://image.pollinations.ai/prompt/");
        let url = service.request_url("a fox/wolf? #1, seed:42");

        assert_eq!(
            url.as_str(),
            "https://image.pollinations.ai/prompt/a%20fox%2Fwolf%3F%20%231,%20seed:42"
        );
        assert_eq!(url.path_segments().map(|s| s.count()), Some(2));
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let service = service("http://localhost:8080/prompt");
        assert_eq!(service.request_url("castle").as_str(), "http://localhost:8080/prompt/castle");
    }
}
