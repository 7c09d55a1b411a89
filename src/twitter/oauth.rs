//! OAuth 1.0a request signing
//!
//! Builds the `Authorization: OAuth ...` header for Twitter API v1.1
//! requests: RFC 3986 percent-encoding, parameter normalization, HMAC-SHA1
//! over the signature base string.
//!
//! Form-encoded request parameters participate in the signature; multipart
//! bodies do not, so APPEND calls sign with an empty parameter list.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use super::TwitterKeys;

type HmacSha1 = Hmac<Sha1>;

/// Percent-encode per RFC 3986 (unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~").
fn percent_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Normalized parameter string: encode keys and values, sort, join with `&`.
fn parameter_string(params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// The string that gets signed: METHOD & encoded-url & encoded-params.
fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(&parameter_string(params))
    )
}

fn signature(
    method: &str,
    base_url: &str,
    params: &[(String, String)],
    keys: &TwitterKeys,
) -> String {
    let base = signature_base_string(method, base_url, params);
    let signing_key = format!(
        "{}&{}",
        percent_encode(&keys.consumer_secret),
        percent_encode(&keys.access_token_secret)
    );

    // HMAC accepts keys of any length
    let mut mac =
        HmacSha1::new_from_slice(signing_key.as_bytes()).expect("HMAC key of any length");
    mac.update(base.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

fn build_header(
    method: &str,
    base_url: &str,
    request_params: &[(&str, &str)],
    keys: &TwitterKeys,
    nonce: &str,
    timestamp: &str,
) -> String {
    let oauth_params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".to_string(), keys.consumer_key.clone()),
        ("oauth_nonce".to_string(), nonce.to_string()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_token".to_string(), keys.access_token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];

    let mut all_params = oauth_params.clone();
    all_params.extend(
        request_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );

    let sig = signature(method, base_url, &all_params, keys);

    let mut header_params = oauth_params;
    header_params.push(("oauth_signature".to_string(), sig));
    header_params.sort();

    let fields = header_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("OAuth {}", fields)
}

/// Build the `Authorization` header value for a request.
///
/// `request_params` must contain every query and form-encoded body
/// parameter of the request.
pub fn authorization_header(
    method: &str,
    base_url: &str,
    request_params: &[(&str, &str)],
    keys: &TwitterKeys,
) -> String {
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .to_string();

    build_header(method, base_url, request_params, keys, &nonce, &timestamp)
}
