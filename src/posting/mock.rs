use super::{PublishError, Publisher};
use crate::types::PostReceipt;
use crate::utils::preview;
use async_trait::async_trait;

/// Publisher used when X.com credentials are missing
///
/// Nothing is sent anywhere. The receipt identifier is `mock-<unix millis>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockPublisher;

#[async_trait]
impl Publisher for MockPublisher {
    fn is_live(&self) -> bool {
        false
    }

    async fn publish(
        &self,
        text: &str,
        image_url: Option<&str>,
    ) -> Result<PostReceipt, PublishError> {
        let post_id = format!("mock-{}", chrono::Utc::now().timestamp_millis());
        tracing::info!(
            text = %preview(text, 30),
            with_image = image_url.is_some(),
            post_id = %post_id,
            "Simulated post (X.com API disabled)"
        );

        Ok(PostReceipt {
            post_url: format!("https://twitter.com/mock/status/{post_id}"),
            post_id,
        })
    }
}
