use super::{Strategy, StrategyContext, StrategyError, selector};
use crate::instagram::identity::HeaderPreset;
use crate::types::{Post, StrategyUsed};
use async_trait::async_trait;
use scraper::Html;
use std::sync::Arc;

const NO_OPEN_GRAPH: &str = "No OpenGraph data found";

/// Reads the `og:*` meta tags of the profile page
pub struct OpenGraphStrategy {
    context: Arc<StrategyContext>,
}

impl OpenGraphStrategy {
    pub fn new(context: Arc<StrategyContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Strategy for OpenGraphStrategy {
    fn tag(&self) -> StrategyUsed {
        StrategyUsed::OpenGraph
    }

    async fn fetch(&self, account: &str) -> Result<Post, StrategyError> {
        let profile_url = self.context.profile_url(account);
        let html = self
            .context
            .get(&profile_url, HeaderPreset::Document, account)
            .await?;

        parse_open_graph(&html, account, &profile_url)
    }
}

/// Build a post from Open Graph tags
///
/// Needs `og:image` plus a description or title; empty tags count as missing.
pub fn parse_open_graph(html: &str, account: &str, profile_url: &str) -> Result<Post, StrategyError> {
    let document = Html::parse_document(html);

    let property = |css: &'static str| -> Result<Option<String>, StrategyError> {
        Ok(document
            .select(&selector(css)?)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string))
    };

    let title = property(r#"meta[property="og:title"]"#)?;
    let image = property(r#"meta[property="og:image"]"#)?;
    let url = property(r#"meta[property="og:url"]"#)?;
    let description = property(r#"meta[property="og:description"]"#)?;

    let image = image.ok_or(StrategyError::NoData(NO_OPEN_GRAPH))?;
    let caption = description
        .or(title)
        .ok_or(StrategyError::NoData(NO_OPEN_GRAPH))?;

    Ok(Post::new(
        account,
        caption,
        image,
        url.unwrap_or_else(|| profile_url.to_string()),
    ))
}
