//! Browser identities presented to Instagram
//!
//! Every strategy picks a user agent from [`USER_AGENTS`] through an
//! [`IdentitySource`] and combines it with its own [`HeaderPreset`].

use rand::Rng;

/// Web app identifier sent with profile API requests
pub const INSTAGRAM_APP_ID: &str = "936619743392459";

/// Desktop and mobile browser user agents rotated between requests
pub const USER_AGENTS: [&str; 7] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/124.0.6327.109 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; SM-S918B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.6327.109 Mobile Safari/537.36",
];

/// Ordered list of request headers
pub type Headers = Vec<(String, String)>;

/// Chooses the user agent for the next request
pub trait IdentitySource: Send + Sync {
    /// User agent string for one request
    fn user_agent(&self) -> &'static str;
}

/// Uniformly random choice from [`USER_AGENTS`]
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIdentity;

impl IdentitySource for RandomIdentity {
    fn user_agent(&self) -> &'static str {
        let index = rand::thread_rng().gen_range(0..USER_AGENTS.len());
        USER_AGENTS[index]
    }
}

/// Always the same entry of [`USER_AGENTS`] (index wraps around)
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedIdentity(pub usize);

impl IdentitySource for FixedIdentity {
    fn user_agent(&self) -> &'static str {
        USER_AGENTS[self.0 % USER_AGENTS.len()]
    }
}

/// Header set matching one kind of browser request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderPreset {
    /// XHR issued by the Instagram web app itself
    ProfileApi,
    /// Plain document load with the consent cookie set
    Document,
    /// Top-level navigation arriving from a search engine
    Navigation,
}

const HTML_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

impl HeaderPreset {
    /// Build the headers for a request about `account`
    ///
    /// `base_url` is the Instagram origin without trailing slash.
    pub fn headers(&self, user_agent: &str, base_url: &str, account: &str) -> Headers {
        let mut headers: Vec<(&str, String)> = vec![
            ("User-Agent", user_agent.to_string()),
            ("Accept-Language", "en-US,en;q=0.5".to_string()),
        ];

        match self {
            HeaderPreset::ProfileApi => headers.extend([
                ("Accept", "*/*".to_string()),
                ("X-IG-App-ID", INSTAGRAM_APP_ID.to_string()),
                ("X-Requested-With", "XMLHttpRequest".to_string()),
                ("Referer", format!("{base_url}/{account}/")),
                ("Origin", base_url.to_string()),
                ("DNT", "1".to_string()),
                ("Connection", "keep-alive".to_string()),
                ("Sec-Fetch-Dest", "empty".to_string()),
                ("Sec-Fetch-Mode", "cors".to_string()),
                ("Sec-Fetch-Site", "same-origin".to_string()),
            ]),
            HeaderPreset::Document => headers.extend([
                ("Accept", HTML_ACCEPT.to_string()),
                ("Cache-Control", "no-cache".to_string()),
                ("Pragma", "no-cache".to_string()),
                ("DNT", "1".to_string()),
                ("Upgrade-Insecure-Requests", "1".to_string()),
                ("Cookie", "ig_cb=1;".to_string()),
            ]),
            HeaderPreset::Navigation => headers.extend([
                ("Accept", HTML_ACCEPT.to_string()),
                ("Referer", "https://www.google.com/".to_string()),
                ("Alt-Used", host_of(base_url)),
                ("Connection", "keep-alive".to_string()),
                ("Upgrade-Insecure-Requests", "1".to_string()),
                ("Sec-Fetch-Dest", "document".to_string()),
                ("Sec-Fetch-Mode", "navigate".to_string()),
                ("Sec-Fetch-Site", "cross-site".to_string()),
                ("Pragma", "no-cache".to_string()),
                ("Cache-Control", "no-cache".to_string()),
            ]),
        }

        headers
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

fn host_of(base_url: &str) -> String {
    url::Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "www.instagram.com".to_string())
}
