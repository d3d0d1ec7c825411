use super::oauth::{Nonce, authorization_header};
use super::{PublishError, Publisher};
use crate::config::{PostingConfig, TwitterCredentials};
use crate::error::{Error, Result};
use crate::retry::{RetryConfig, with_retry};
use crate::types::PostReceipt;
use crate::utils::preview;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, REFERER, USER_AGENT};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: Option<CreatedTweet>,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

/// Publisher talking to the X.com API with user-context OAuth 1.0a
///
/// Text goes to `POST /2/tweets`; an image is first downloaded, checked
/// against the allowed media types and size, and uploaded through
/// `POST /1.1/media/upload.json`.
pub struct TwitterPublisher {
    http: reqwest::Client,
    credentials: TwitterCredentials,
    api_base_url: String,
    upload_base_url: String,
    allowed_media_types: Vec<String>,
    max_media_bytes: usize,
    retry: RetryConfig,
}

impl TwitterPublisher {
    pub fn new(credentials: TwitterCredentials, config: &PostingConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            credentials,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            upload_base_url: config.upload_base_url.trim_end_matches('/').to_string(),
            allowed_media_types: config.allowed_media_types.clone(),
            max_media_bytes: config.max_media_bytes,
            retry: RetryConfig {
                max_attempts: 2,
                initial_delay: Duration::from_secs(2),
                max_delay: Duration::from_secs(2),
                backoff_multiplier: 1.0,
                jitter: false,
            },
        })
    }

    fn sign(&self, method: &str, url: &str) -> String {
        authorization_header(&self.credentials, method, url, &[], &Nonce::generate())
    }

    /// Download an image and upload it as media, returning the media id
    async fn attach_image(&self, image_url: &str) -> std::result::Result<String, String> {
        let response = self
            .http
            .get(image_url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(REFERER, "https://twitter.com/")
            .send()
            .await
            .map_err(|e| format!("failed to download image: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("image download returned HTTP {}", response.status()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();
        if !self.allowed_media_types.iter().any(|t| *t == content_type) {
            return Err(format!("unsupported media type: {content_type}"));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read image: {e}"))?;
        if bytes.len() > self.max_media_bytes {
            return Err(format!(
                "image is {} bytes, limit is {}",
                bytes.len(),
                self.max_media_bytes
            ));
        }

        let url = format!("{}/1.1/media/upload.json", self.upload_base_url);
        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name("media")
            .mime_str(&content_type)
            .map_err(|e| format!("invalid media type: {e}"))?;
        let form = reqwest::multipart::Form::new().part("media", part);

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.sign("POST", &url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("media upload failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("media upload returned HTTP {status}: {body}"));
        }

        let uploaded: MediaUploadResponse = response
            .json()
            .await
            .map_err(|e| format!("unexpected media upload response: {e}"))?;
        Ok(uploaded.media_id_string)
    }

    async fn create_post(
        &self,
        text: &str,
        media_id: Option<&str>,
    ) -> std::result::Result<String, PublishError> {
        let url = format!("{}/2/tweets", self.api_base_url);
        let mut body = json!({ "text": text });
        if let Some(id) = media_id {
            body["media"] = json!({ "media_ids": [id] });
        }

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.sign("POST", &url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            return Err(classify_rejection(status.as_u16(), &raw));
        }

        let created: CreateTweetResponse = serde_json::from_str(&raw)
            .map_err(|e| PublishError::InvalidResponse(e.to_string()))?;
        created
            .data
            .map(|tweet| tweet.id)
            .ok_or_else(|| PublishError::InvalidResponse("missing data.id".to_string()))
    }
}

/// Map an error response of the posting endpoint
fn classify_rejection(status: u16, body: &str) -> PublishError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let detail = parsed
        .as_ref()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.pointer("/errors/0/message"))
                .or_else(|| v.get("title"))
        })
        .and_then(|v| v.as_str())
        .unwrap_or(body)
        .to_string();

    let lowered = body.to_ascii_lowercase();
    if status == 403
        && (lowered.contains("oauth1 app permissions") || lowered.contains("oauth1-permissions"))
    {
        return PublishError::Permission;
    }

    PublishError::Rejected {
        status,
        message: detail,
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    fn is_live(&self) -> bool {
        true
    }

    async fn publish(
        &self,
        text: &str,
        image_url: Option<&str>,
    ) -> std::result::Result<PostReceipt, PublishError> {
        if text.trim().is_empty() {
            return Err(PublishError::InvalidInput("Post text must not be empty".into()));
        }

        tracing::info!(text = %preview(text, 30), "Preparing to post");

        let mut media_id = None;
        if let Some(image_url) = image_url {
            match self.attach_image(image_url).await {
                Ok(id) => media_id = Some(id),
                Err(e) => {
                    tracing::warn!(image_url = %image_url, error = %e, "Media upload failed, posting text only")
                }
            }
        }

        let post_id = with_retry(&self.retry, |_| self.create_post(text, media_id.as_deref())).await?;

        tracing::info!(post_id = %post_id, with_media = media_id.is_some(), "Posted to X.com");
        Ok(PostReceipt {
            post_url: format!("https://twitter.com/user/status/{post_id}"),
            post_id,
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn publisher(server: &MockServer) -> TwitterPublisher {
        let config = PostingConfig {
            api_base_url: server.uri(),
            upload_base_url: server.uri(),
            ..PostingConfig::default()
        };
        let credentials = TwitterCredentials {
            api_key: "key".into(),
            api_secret: "secret".into(),
            access_token: "token".into(),
            access_secret: "token-secret".into(),
        };
        TwitterPublisher::new(credentials, &config).unwrap()
    }

    #[tokio::test]
    async fn test_text_only_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .and(header_exists("authorization"))
            .and(body_json(json!({"text": "Rare snow leopard spotted."})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {"id": "1780000000000000001", "text": "Rare snow leopard spotted."}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = publisher(&server)
            .publish("Rare snow leopard spotted.", None)
            .await
            .unwrap();

        assert_eq!(receipt.post_id, "1780000000000000001");
        assert_eq!(
            receipt.post_url,
            "https://twitter.com/user/status/1780000000000000001"
        );
    }

    #[tokio::test]
    async fn test_post_with_uploaded_image() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images/leopard.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg")
                    .set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "media_id": 710511363345354753u64,
                "media_id_string": "710511363345354753"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .and(body_json(json!({
                "text": "With picture",
                "media": {"media_ids": ["710511363345354753"]}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "42"}})))
            .expect(1)
            .mount(&server)
            .await;

        let image_url = format!("{}/images/leopard.jpg", server.uri());
        let receipt = publisher(&server)
            .publish("With picture", Some(&image_url))
            .await
            .unwrap();
        assert_eq!(receipt.post_id, "42");
    }

    #[tokio::test]
    async fn test_unsupported_media_falls_back_to_text_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page.html"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=utf-8")
                    .set_body_string("<html></html>"),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .and(body_json(json!({"text": "No picture"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "7"}})))
            .expect(1)
            .mount(&server)
            .await;

        let image_url = format!("{}/page.html", server.uri());
        let receipt = publisher(&server)
            .publish("No picture", Some(&image_url))
            .await
            .unwrap();
        assert_eq!(receipt.post_id, "7");
    }

    #[tokio::test]
    async fn test_permission_problem_is_recognized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "title": "Forbidden",
                "type": "https://api.twitter.com/2/problems/oauth1-permissions",
                "detail": "Your client app is not configured with the appropriate oauth1 app permissions for this endpoint.",
                "status": 403
            })))
            .mount(&server)
            .await;

        let err = publisher(&server).publish("hello", None).await.unwrap_err();
        assert!(err.is_permission());
    }

    #[tokio::test]
    async fn test_other_rejections_keep_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "detail": "You are not allowed to create a Tweet with duplicate content.",
                "status": 403
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = publisher(&server).publish("hello", None).await.unwrap_err();
        match err {
            PublishError::Rejected { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("duplicate content"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_text_is_invalid() {
        let server = MockServer::start().await;
        let err = publisher(&server).publish("   ", None).await.unwrap_err();
        assert!(matches!(err, PublishError::InvalidInput(_)));
    }

    #[test]
    fn test_classify_plain_text_body() {
        let err = classify_rejection(503, "Service Unavailable");
        assert!(
            matches!(err, PublishError::Rejected { status: 503, ref message } if message == "Service Unavailable")
        );
    }
}
