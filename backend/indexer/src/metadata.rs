//! Application metadata URIs.
//!
//! Applicants submit a `metadata_uri` with their application. Without an
//! external storage service the content travels inline as a data URI:
//!
//! ```text
//! data:application/json,%7B%22applicantName%22%3A%22Ada%22%2C...%7D
//! ```
//!
//! The JSON is escaped the way `encodeURIComponent` escapes it. Base64 data
//! URIs are accepted when reading; any other scheme (ipfs://, https://) is
//! left to the caller.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::errors::{IndexerError, Result};

const DATA_SCHEME: &str = "data:";
const JSON_MEDIA_TYPE: &str = "application/json";

/// Characters `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Off-chain content of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationMetadata {
    pub applicant_name: String,
    pub email: String,
    pub essay: String,
    /// Submission time, Unix milliseconds.
    pub timestamp: i64,
}

impl ApplicationMetadata {
    /// Build metadata stamped with the current time.
    pub fn new(applicant_name: String, email: String, essay: String) -> Result<Self> {
        let metadata = Self {
            applicant_name,
            email,
            essay,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// Every field must be filled in.
    pub fn validate(&self) -> Result<()> {
        let blank = [
            ("applicantName", &self.applicant_name),
            ("email", &self.email),
            ("essay", &self.essay),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        match blank {
            Some((field, _)) => Err(IndexerError::Metadata(format!("{field} must not be empty"))),
            None => Ok(()),
        }
    }

    /// Encode as an inline `data:application/json,` URI.
    pub fn to_data_uri(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(format!(
            "{DATA_SCHEME}{JSON_MEDIA_TYPE},{}",
            utf8_percent_encode(&json, URI_COMPONENT)
        ))
    }
}

/// Decode inline metadata.
///
/// Returns `Ok(None)` for URIs that point elsewhere (ipfs://, https://);
/// a malformed data URI is an error.
pub fn decode_metadata_uri(uri: &str) -> Result<Option<ApplicationMetadata>> {
    let Some(rest) = strip_prefix_ignore_case(uri.trim(), DATA_SCHEME) else {
        return Ok(None);
    };

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| IndexerError::Metadata("data URI has no payload".to_string()))?;

    let mut params = header.split(';').map(str::trim);
    let media_type = params.next().unwrap_or_default();
    if !media_type.is_empty() && !media_type.eq_ignore_ascii_case(JSON_MEDIA_TYPE) {
        return Err(IndexerError::Metadata(format!(
            "unsupported media type `{media_type}`"
        )));
    }
    let is_base64 = params.any(|p| p.eq_ignore_ascii_case("base64"));

    let json = if is_base64 {
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| IndexerError::Metadata(format!("invalid base64 payload: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| IndexerError::Metadata(format!("payload is not UTF-8: {e}")))?
    } else {
        percent_decode_str(payload)
            .decode_utf8()
            .map_err(|e| IndexerError::Metadata(format!("payload is not UTF-8: {e}")))?
            .into_owned()
    };

    Ok(Some(serde_json::from_str(&json)?))
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}
