//! Blocking HTTP client for the Sefaria texts API, and parsing of its
//! responses into per-verse strings.

use super::{clean_markup, ApiConfig, FetchError, TextApi};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// `TextApi` backed by a real HTTP client.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<HttpApi, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("tanakh-epub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(HttpApi {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl TextApi for HttpApi {
    fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        log::debug!("GET {url} {query:?}");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| classify(&url, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited { url });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response.json::<Value>().map_err(|e| classify(&url, e))
    }
}

fn classify(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_decode() {
        FetchError::UnexpectedShape {
            reference: url.to_string(),
            reason: format!("response is not JSON: {error}"),
        }
    } else if let Some(status) = error.status() {
        FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}

/// The verse strings of one chapter, as returned by the texts endpoint.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChapterText {
    pub hebrew: Vec<String>,
    pub english: Vec<String>,
    /// Title of the English version the API actually served
    pub version_title: Option<String>,
}

impl ChapterText {
    pub fn parse(body: &Value, reference: &str) -> Result<ChapterText, FetchError> {
        let object = body
            .as_object()
            .ok_or_else(|| shape(reference, "body is not an object"))?;
        if let Some(error) = object.get("error") {
            let message = error
                .as_str()
                .map(ToString::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(shape(reference, &message));
        }

        let hebrew = match object.get("he") {
            Some(value) => verse_strings(value, reference, "he")?,
            None => return Err(shape(reference, "missing `he` field")),
        };
        let english = match object.get("text") {
            Some(value) => verse_strings(value, reference, "text")?,
            None => Vec::new(),
        };
        if hebrew.is_empty() && english.is_empty() {
            return Err(shape(reference, "chapter contains no verses"));
        }

        let version_title = object
            .get("versionTitle")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string);

        Ok(ChapterText {
            hebrew,
            english,
            version_title,
        })
    }
}

/// Parse a commentary response: one entry per verse, each the joined comments
/// on that verse (empty when the verse has none).
pub fn parse_commentary(body: &Value, reference: &str) -> Result<Vec<String>, FetchError> {
    let object = body.as_object().ok_or_else(|| shape(reference, "body is not an object"))?;
    if let Some(error) = object.get("error") {
        let message = error.as_str().map(ToString::to_string).unwrap_or_else(|| error.to_string());
        return Err(shape(reference, &message));
    }
    match object.get("he") {
        Some(value) => verse_strings(value, reference, "he"),
        None => Ok(Vec::new()),
    }
}

/// A verse field is a single string, or a list whose items are strings or
/// nested lists of strings (segments joined with a space).
fn verse_strings(value: &Value, reference: &str, field: &str) -> Result<Vec<String>, FetchError> {
    match value {
        Value::String(s) => Ok(vec![clean_markup(s)]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                let mut segments = Vec::new();
                flatten(item, &mut segments)
                    .map_err(|kind| shape(reference, &format!("`{field}` contains {kind}")))?;
                Ok(clean_markup(&segments.join(" ")))
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(shape(
            reference,
            &format!("`{field}` is {}, not a string or list", kind_of(other)),
        )),
    }
}

fn flatten<'a>(value: &'a Value, out: &mut Vec<&'a str>) -> Result<(), &'static str> {
    match value {
        Value::String(s) => out.push(s),
        Value::Array(items) => {
            for item in items {
                flatten(item, out)?;
            }
        }
        Value::Null => {}
        other => return Err(kind_of(other)),
    }
    Ok(())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn shape(reference: &str, reason: &str) -> FetchError {
    FetchError::UnexpectedShape {
        reference: reference.to_string(),
        reason: reason.to_string(),
    }
}
