use super::{Strategy, StrategyContext, StrategyError, selector};
use crate::instagram::identity::HeaderPreset;
use crate::types::{Post, StrategyUsed};
use async_trait::async_trait;
use scraper::Html;
use std::sync::Arc;

const NO_MARKUP_DATA: &str = "No usable data found in page markup";

/// Meta descriptions this short are boilerplate
const MIN_DESCRIPTION_CHARS: usize = 20;

/// Scans the profile page for CDN images and caption-like text
pub struct MarkupStrategy {
    context: Arc<StrategyContext>,
}

impl MarkupStrategy {
    pub fn new(context: Arc<StrategyContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Strategy for MarkupStrategy {
    fn tag(&self) -> StrategyUsed {
        StrategyUsed::Markup
    }

    async fn fetch(&self, account: &str) -> Result<Post, StrategyError> {
        let profile_url = self.context.profile_url(account);
        let html = self
            .context
            .get(&profile_url, HeaderPreset::Navigation, account)
            .await?;

        parse_markup(&html, account, &profile_url)
    }
}

/// Build a post from the first Instagram-hosted image and the longest caption candidate
///
/// Caption candidates are `<title>` texts that mention the account and meta
/// descriptions longer than 20 characters.
pub fn parse_markup(html: &str, account: &str, profile_url: &str) -> Result<Post, StrategyError> {
    let document = Html::parse_document(html);
    let img_sel = selector("img[src]")?;
    let title_sel = selector("title")?;
    let description_sel = selector(r#"meta[name="description"]"#)?;

    let image = document
        .select(&img_sel)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| src.contains("instagram") && src.contains("http"))
        .map(str::to_string);

    let titles = document
        .select(&title_sel)
        .map(|el| el.text().collect::<String>())
        .filter(|text| !text.is_empty() && text.contains(account));

    let descriptions = document
        .select(&description_sel)
        .filter_map(|el| el.value().attr("content"))
        .filter(|content| content.chars().count() > MIN_DESCRIPTION_CHARS)
        .map(str::to_string);

    let mut caption: Option<String> = None;
    for candidate in titles.chain(descriptions) {
        let longer = caption
            .as_ref()
            .is_none_or(|best| candidate.chars().count() > best.chars().count());
        if longer {
            caption = Some(candidate);
        }
    }

    match (image, caption) {
        (Some(image), Some(caption)) => Ok(Post::new(account, caption, image, profile_url)),
        _ => Err(StrategyError::NoData(NO_MARKUP_DATA)),
    }
}
