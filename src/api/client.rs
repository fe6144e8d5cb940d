use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::models::UserProfile;
use crate::error::{BotError, ProfileFetchError};

/// Where raw user profiles come from
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_user(&self, user_id: u64) -> Result<UserProfile, ProfileFetchError>;
}

/// Authenticated client for the Discord REST API
pub struct DiscordApi {
    http_client: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl DiscordApi {
    pub fn new(api_base: &str, bot_token: &str, timeout: Duration) -> Result<Self, BotError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| BotError::HttpClient { source })?;

        Ok(Self::with_client(http_client, api_base, bot_token))
    }

    pub fn with_client(http_client: reqwest::Client, api_base: &str, bot_token: &str) -> Self {
        Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
        }
    }

    fn user_url(&self, user_id: u64) -> String {
        format!("{}/users/{}", self.api_base, user_id)
    }
}

#[async_trait]
impl ProfileSource for DiscordApi {
    async fn fetch_user(&self, user_id: u64) -> Result<UserProfile, ProfileFetchError> {
        let url = self.user_url(user_id);
        debug!("Fetching profile from {}", url);

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bot {}", self.bot_token))
            .send()
            .await
            .map_err(|source| ProfileFetchError::Transport { user_id, source })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ProfileFetchError::Status { user_id, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ProfileFetchError::Transport { user_id, source })?;

        serde_json::from_str(&body).map_err(|e| ProfileFetchError::Decode {
            user_id,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = vec![0u8; 8192];
        let mut read = 0;
        while read < buf.len() {
            let n = socket.read(&mut buf[read..]).await.unwrap();
            if n == 0 {
                break;
            }
            read += n;
            if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        String::from_utf8_lossy(&buf[..read]).to_string()
    }

    /// Serve a single canned response; the received request head is sent back on the channel
    async fn serve_once(response: String) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            let _ = tx.send(request);
        });

        (format!("http://{}/api/v10", addr), rx)
    }

    fn api(base: &str, timeout: Duration) -> DiscordApi {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .unwrap();
        DiscordApi::with_client(client, base, "test-token")
    }

    #[test]
    fn test_user_url() {
        let api = DiscordApi::new(
            "https://discord.com/api/v10/",
            "token",
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(
            api.user_url(80351110224678912),
            "https://discord.com/api/v10/users/80351110224678912"
        );
    }

    #[tokio::test]
    async fn test_fetch_user_ok() {
        let (base, request) = serve_once(http_response(
            "200 OK",
            r#"{"id": "42", "username": "nelly", "public_flags": 4194304}"#,
        ))
        .await;

        let profile = api(&base, Duration::from_secs(5)).fetch_user(42).await.unwrap();
        assert_eq!(profile.username, "nelly");
        assert_eq!(profile.flags(), 1 << 22);

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /api/v10/users/42 http/1.1"));
        assert!(request.contains("authorization: bot test-token"));
    }

    #[tokio::test]
    async fn test_non_ok_status_is_failure() {
        for (status_line, code) in [("204 No Content", 204), ("404 Not Found", 404)] {
            let (base, _request) = serve_once(http_response(status_line, "")).await;

            let err = api(&base, Duration::from_secs(5)).fetch_user(42).await.unwrap_err();
            match err {
                ProfileFetchError::Status { user_id, status } => {
                    assert_eq!(user_id, 42);
                    assert_eq!(status.as_u16(), code);
                }
                other => panic!("expected status error for {}, got {:?}", code, other),
            }
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_failure() {
        let (base, _request) = serve_once(http_response("200 OK", "{}")).await;

        let err = api(&base, Duration::from_secs(5)).fetch_user(42).await.unwrap_err();
        assert!(matches!(err, ProfileFetchError::Decode { user_id: 42, .. }));
    }

    #[tokio::test]
    async fn test_slow_api_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let base = format!("http://{}/api/v10", addr);
        let err = api(&base, Duration::from_millis(200))
            .fetch_user(42)
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.user_id(), 42);
    }
}
