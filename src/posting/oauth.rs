//! OAuth 1.0a request signing (HMAC-SHA1)

use crate::config::TwitterCredentials;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Per-request values that make a signature unique
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nonce {
    /// Random token
    pub nonce: String,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
}

impl Nonce {
    /// Fresh random nonce stamped with the current time
    pub fn generate() -> Self {
        let nonce = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        Self {
            nonce,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// RFC 3986 percent-encoding as required by OAuth 1.0a
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Compute the `oauth_signature` for a request
///
/// `url` must not carry a query string; query and form parameters go into
/// `params`. JSON and multipart bodies are not part of the signature.
pub fn signature(
    credentials: &TwitterCredentials,
    method: &str,
    url: &str,
    params: &[(String, String)],
) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    pairs.sort();

    let parameter_string = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(url),
        encode(&parameter_string)
    );
    let signing_key = format!(
        "{}&{}",
        encode(&credentials.api_secret),
        encode(&credentials.access_secret)
    );

    // HMAC accepts keys of any length
    let mut mac = match HmacSha1::new_from_slice(signing_key.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(base_string.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Build the `Authorization` header value for a request
///
/// `extra_params` are the query or form parameters sent with the request.
pub fn authorization_header(
    credentials: &TwitterCredentials,
    method: &str,
    url: &str,
    extra_params: &[(String, String)],
    nonce: &Nonce,
) -> String {
    let mut oauth_params = vec![
        ("oauth_consumer_key".to_string(), credentials.api_key.clone()),
        ("oauth_nonce".to_string(), nonce.nonce.clone()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        ("oauth_timestamp".to_string(), nonce.timestamp.to_string()),
        ("oauth_token".to_string(), credentials.access_token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];

    let mut all_params = oauth_params.clone();
    all_params.extend_from_slice(extra_params);
    let signature = signature(credentials, method, url, &all_params);
    oauth_params.push(("oauth_signature".to_string(), signature));
    oauth_params.sort();

    let fields = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {fields}")
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    // Values from the "Creating a signature" walkthrough in the X developer documentation
    fn reference_credentials() -> TwitterCredentials {
        TwitterCredentials {
            api_key: "xvz1evFS4wEEPTGEFPHBog".into(),
            api_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".into(),
            access_token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".into(),
            access_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".into(),
        }
    }

    fn reference_nonce() -> Nonce {
        Nonce {
            nonce: "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg".into(),
            timestamp: 1318622958,
        }
    }

    fn reference_params() -> Vec<(String, String)> {
        vec![
            (
                "status".into(),
                "Hello Ladies + Gentlemen, a signed OAuth request!".into(),
            ),
            ("include_entities".into(), "true".into()),
        ]
    }

    #[test]
    fn test_reference_signature() {
        let credentials = reference_credentials();
        let nonce = reference_nonce();
        let mut params = reference_params();
        params.extend([
            ("oauth_consumer_key".to_string(), credentials.api_key.clone()),
            ("oauth_nonce".to_string(), nonce.nonce.clone()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), nonce.timestamp.to_string()),
            ("oauth_token".to_string(), credentials.access_token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ]);

        let signature = signature(
            &credentials,
            "post",
            "https://api.twitter.com/1.1/statuses/update.json",
            &params,
        );
        assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn test_reference_authorization_header() {
        let header = authorization_header(
            &reference_credentials(),
            "POST",
            "https://api.twitter.com/1.1/statuses/update.json",
            &reference_params(),
            &reference_nonce(),
        );

        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(header.contains("oauth_version=\"1.0\""));
        assert!(!header.contains("status="), "request parameters stay out of the header");
    }

    #[test]
    fn test_generated_nonces_differ() {
        let a = Nonce::generate();
        let b = Nonce::generate();
        assert_eq!(a.nonce.len(), 32);
        assert_ne!(a.nonce, b.nonce);
    }
}
