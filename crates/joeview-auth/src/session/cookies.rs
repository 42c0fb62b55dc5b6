//! Auth cookie codec.
//!
//! The session lives in a cookie named `sb-<project-ref>-auth-token`. Large
//! values are split across `<name>.0`, `<name>.1`, ... and the value itself
//! is either raw JSON or `base64-` followed by base64url JSON.

use std::collections::HashMap;

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use cookie::time::Duration;
use cookie::{Cookie, SameSite};
use thiserror::Error;

use joeview_entity::session::AuthSession;

/// Prefix marking a base64url-encoded cookie value.
const BASE64_PREFIX: &str = "base64-";
/// Largest value written into a single cookie.
pub const MAX_CHUNK_SIZE: usize = 3180;
/// Lifetime of written session cookies.
const COOKIE_MAX_AGE_DAYS: i64 = 400;

/// Base64url decoder that accepts values with or without padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A session cookie that could not be decoded.
#[derive(Debug, Error)]
pub enum CookieError {
    /// The `base64-` payload was not valid base64url.
    #[error("invalid base64 in auth cookie: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The decoded payload was not UTF-8.
    #[error("auth cookie is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// The payload was not a session object.
    #[error("auth cookie does not hold a session: {0}")]
    Json(#[from] serde_json::Error),
}

/// Cookies to set and expire on the response.
#[derive(Debug, Clone, Default)]
pub struct CookieUpdates {
    /// Cookies to write.
    pub set: Vec<Cookie<'static>>,
    /// Cookies to expire (stale chunks of a previous session).
    pub remove: Vec<Cookie<'static>>,
}

impl CookieUpdates {
    /// Whether nothing needs to be written.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.remove.is_empty()
    }
}

/// Reads and writes the auth session cookie.
#[derive(Debug, Clone)]
pub struct AuthCookieCodec {
    name: String,
}

impl AuthCookieCodec {
    /// Create a codec for the given base cookie name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Base cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw stored value, joining chunks in index order.
    ///
    /// An unchunked cookie wins over chunks. Chunks are read from `.0`
    /// upwards until the first missing index.
    pub fn combined_value(&self, cookies: &[Cookie<'_>]) -> Option<String> {
        let by_name: HashMap<&str, &str> = cookies.iter().map(|c| (c.name(), c.value())).collect();

        if let Some(value) = by_name.get(self.name.as_str()) {
            return Some((*value).to_string());
        }

        let mut combined = String::new();
        let mut index = 0usize;
        while let Some(chunk) = by_name.get(self.chunk_name(index).as_str()) {
            combined.push_str(chunk);
            index += 1;
        }

        (index > 0).then_some(combined)
    }

    /// Decode the stored session, if one is present.
    pub fn read(&self, cookies: &[Cookie<'_>]) -> Result<Option<AuthSession>, CookieError> {
        let Some(raw) = self.combined_value(cookies) else {
            return Ok(None);
        };
        decode_value(&raw).map(Some)
    }

    /// Cookies that store `session`, replacing whatever `existing` holds.
    ///
    /// Any cookie of this session family in `existing` that the new value
    /// does not overwrite is expired.
    pub fn write(
        &self,
        session: &AuthSession,
        existing: &[Cookie<'_>],
    ) -> Result<CookieUpdates, CookieError> {
        let value = encode_value(session)?;

        let set: Vec<Cookie<'static>> = if value.len() <= MAX_CHUNK_SIZE {
            vec![self.build(self.name.clone(), value)]
        } else {
            // The encoded value is ASCII, so byte offsets are char boundaries.
            value
                .as_bytes()
                .chunks(MAX_CHUNK_SIZE)
                .enumerate()
                .map(|(i, chunk)| {
                    self.build(
                        self.chunk_name(i),
                        String::from_utf8_lossy(chunk).into_owned(),
                    )
                })
                .collect()
        };

        let remove = existing
            .iter()
            .map(|c| c.name())
            .filter(|name| self.is_family(name))
            .filter(|name| !set.iter().any(|c| c.name() == *name))
            .map(|name| self.build(name.to_string(), String::new()))
            .collect();

        Ok(CookieUpdates { set, remove })
    }

    /// Expire every cookie of this session family found in `existing`.
    pub fn clear(&self, existing: &[Cookie<'_>]) -> CookieUpdates {
        let remove = existing
            .iter()
            .map(|c| c.name())
            .filter(|name| self.is_family(name))
            .map(|name| self.build(name.to_string(), String::new()))
            .collect();

        CookieUpdates {
            set: Vec::new(),
            remove,
        }
    }

    fn chunk_name(&self, index: usize) -> String {
        format!("{}.{index}", self.name)
    }

    /// Whether `name` is the base cookie or one of its chunks.
    fn is_family(&self, name: &str) -> bool {
        if name == self.name {
            return true;
        }
        name.strip_prefix(self.name.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|idx| !idx.is_empty() && idx.bytes().all(|b| b.is_ascii_digit()))
    }

    fn build(&self, name: String, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(Duration::days(COOKIE_MAX_AGE_DAYS))
            .build()
    }
}

/// Decode a stored cookie value into a session.
pub fn decode_value(raw: &str) -> Result<AuthSession, CookieError> {
    let json = match raw.strip_prefix(BASE64_PREFIX) {
        Some(encoded) => String::from_utf8(URL_SAFE_LENIENT.decode(encoded.trim_end())?)?,
        None => raw.to_string(),
    };
    Ok(serde_json::from_str(&json)?)
}

/// Encode a session as `base64-` + base64url JSON.
pub fn encode_value(session: &AuthSession) -> Result<String, CookieError> {
    let json = serde_json::to_string(session)?;
    Ok(format!("{BASE64_PREFIX}{}", URL_SAFE_NO_PAD.encode(json)))
}
