use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_LANGUAGE};
use serde::{Deserialize, Serialize};

use crate::app::{NewsbriefError, Result};

/// Browser-like request identity shared by the static and rendered fetch paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeaderProfile {
    /// User agent sent on every page request
    pub user_agent: String,

    /// Browser locale for rendered pages (default: "en-US")
    pub locale: String,

    /// Accept-Language header value
    pub accept_language: String,

    /// Additional headers sent with every page request
    pub extra: BTreeMap<String, String>,
}

impl Default for HeaderProfile {
    fn default() -> Self {
        let extra = [
            ("Referer", "https://www.google.com/"),
            ("Upgrade-Insecure-Requests", "1"),
            ("DNT", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36"
                .to_string(),
            locale: "en-US".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            extra,
        }
    }
}

impl HeaderProfile {
    /// Headers for the static HTTP client. The user agent is set on the client
    /// builder, not here.
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, header_value(&self.accept_language)?);

        for (name, value) in &self.extra {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| NewsbriefError::Config(format!("Invalid header name {}: {}", name, e)))?;
            headers.insert(name, header_value(value)?);
        }

        Ok(headers)
    }

    /// Extra headers for a browser context, as the JSON object CDP expects.
    pub fn browser_headers(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(
            "Accept-Language".to_string(),
            serde_json::Value::String(self.accept_language.clone()),
        );
        for (name, value) in &self.extra {
            map.insert(name.clone(), serde_json::Value::String(value.clone()));
        }
        serde_json::Value::Object(map)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| NewsbriefError::Config(format!("Invalid header value {:?}: {}", value, e)))
}
