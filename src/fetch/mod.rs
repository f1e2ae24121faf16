//! Fetching verse text from the remote text API.
//!
//! Requests are issued one at a time in canonical order, with a configurable
//! delay between them. Transient failures (timeouts, connection failures,
//! HTTP 5xx and 429) are retried with exponential backoff up to a bounded
//! number of attempts; anything else fails the fetch immediately.

mod clean;
pub use clean::clean_markup;

mod sefaria;
pub use sefaria::{parse_commentary, ChapterText, HttpApi};

use crate::canon::BookInfo;
use crate::config::Configuration;
use crate::source::{Verse, VerseBuilder};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("failed to reach {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} rejected the request because of rate limiting")]
    RateLimited { url: String },

    #[error("unexpected response for {reference}: {reason}")]
    UnexpectedShape { reference: String, reason: String },
}

impl FetchError {
    /// Whether retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout { .. }
            | FetchError::Network { .. }
            | FetchError::RateLimited { .. } => true,
            FetchError::Status { status, .. } => *status >= 500,
            FetchError::UnexpectedShape { .. } => false,
        }
    }
}

/// One JSON GET against the text API.
pub trait TextApi {
    /// Fetch `path` (relative to the API base URL) with the given query.
    fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError>;
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Minimum delay between successive requests
    pub request_delay_ms: u64,
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,
    /// Delay before the first retry; doubles for every further retry
    pub backoff_ms: u64,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "https://www.sefaria.org".to_string(),
            request_delay_ms: 250,
            max_retries: 3,
            backoff_ms: 500,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Backoff before the given retry (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry.saturating_sub(1));
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

/// Rate-limited, retrying verse fetcher.
pub struct Fetcher<A> {
    api: A,
    config: ApiConfig,
    last_request: Option<Instant>,
}

impl<A: TextApi> Fetcher<A> {
    pub fn new(api: A, config: &ApiConfig) -> Fetcher<A> {
        Fetcher {
            api,
            config: config.clone(),
            last_request: None,
        }
    }

    /// Fetch every verse of the given chapters of a book, in order.
    ///
    /// Fails on the first chapter that can't be fetched; nothing fetched for
    /// the book so far is returned in that case.
    pub fn fetch_book(
        &mut self,
        book: &BookInfo,
        chapters: RangeInclusive<u32>,
        config: &Configuration,
        progress: &ProgressBar,
    ) -> Result<Vec<Verse>, FetchError> {
        info!(
            "fetching {book} ({}, book {}) chapters {}-{}",
            book.division,
            book.position,
            chapters.start(),
            chapters.end()
        );
        let mut verses = Vec::new();
        for chapter in chapters {
            progress.set_message(format!("{} {}", book.name, chapter));
            verses.extend(self.fetch_chapter(book, chapter, config)?);
            progress.inc(1);
        }
        Ok(verses)
    }

    /// Fetch one chapter's verses, with commentary when configured.
    pub fn fetch_chapter(
        &mut self,
        book: &BookInfo,
        chapter: u32,
        config: &Configuration,
    ) -> Result<Vec<Verse>, FetchError> {
        let reference = format!("{} {}", book.name, chapter);

        let mut query = vec![
            ("context", "0".to_string()),
            ("commentary", "0".to_string()),
        ];
        if let Some(version) = config.translation.version_title() {
            query.push(("ven", version.replace(' ', "_")));
        }
        let path = format!("api/texts/{}.{}", book.api_name(), chapter);
        let body = self.request(&path, &query)?;
        let text = ChapterText::parse(&body, &reference)?;

        if let (Some(wanted), Some(served)) =
            (config.translation.version_title(), &text.version_title)
        {
            if wanted != served.as_str() {
                warn!("{reference}: requested \"{wanted}\" but the API served \"{served}\"");
            }
        }

        let commentary = if config.include_commentary {
            self.fetch_commentary(book, chapter)?
        } else {
            Vec::new()
        };

        let count = text.hebrew.len().max(text.english.len());
        debug!("{reference}: {count} verses");

        let mut hebrew = text.hebrew.into_iter();
        let mut english = text.english.into_iter();
        let mut commentary = commentary.into_iter();
        (1..=count as u32)
            .map(|number| {
                let mut builder = VerseBuilder::default();
                builder
                    .book(book.name)
                    .chapter(chapter)
                    .number(number)
                    .hebrew(hebrew.next().unwrap_or_default());
                if let Some(english) = english.next() {
                    builder.translation((config.translation, english));
                }
                if let Some(comment) = commentary.next().filter(|c| !c.is_empty()) {
                    builder.commentary(comment);
                }
                builder.build().map_err(|e| FetchError::UnexpectedShape {
                    reference: format!("{reference}:{number}"),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Rashi's commentary on a chapter; a chapter without commentary (HTTP 404)
    /// yields no comments rather than an error.
    fn fetch_commentary(
        &mut self,
        book: &BookInfo,
        chapter: u32,
    ) -> Result<Vec<String>, FetchError> {
        let reference = format!("Rashi on {} {}", book.name, chapter);
        let path = format!("api/texts/Rashi_on_{}.{}", book.api_name(), chapter);
        let query = [("context", "0".to_string())];

        match self.request(&path, &query) {
            Ok(body) => parse_commentary(&body, &reference),
            Err(FetchError::Status { status: 404, .. }) => {
                warn!("no commentary available for {book} {chapter}");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Issue a request, honouring the inter-request delay and retrying
    /// transient failures.
    fn request(&mut self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let mut retries = 0;
        loop {
            self.throttle();
            let result = self.api.get_json(path, query);
            self.last_request = Some(Instant::now());
            match result {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && retries < self.config.max_retries => {
                    retries += 1;
                    let delay = self.config.backoff(retries);
                    warn!(
                        "{e}; retrying in {delay:?} (retry {retries} of {})",
                        self.config.max_retries
                    );
                    std::thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Wait until the configured delay has passed since the last response.
    fn throttle(&self) {
        let delay = Duration::from_millis(self.config.request_delay_ms);
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < delay {
                std::thread::sleep(delay - elapsed);
            }
        }
    }
}


#[cfg(test)]
mod test {
    use super::fake::{chapter_body, FakeApi};
    use super::*;
    use crate::canon::BookInfo;
    use crate::source::Translation;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn quick_config() -> Configuration {
        let mut config = Configuration::default();
        config.api.request_delay_ms = 0;
        config.api.backoff_ms = 1;
        config
    }

    fn genesis() -> &'static BookInfo {
        BookInfo::find("Genesis").expect("Genesis exists")
    }

    #[test]
    fn can_fetch_chapter() {
        let config = quick_config();
        let mut fetcher = Fetcher::new(FakeApi::with_verses(3), &config.api);
        let verses = fetcher
            .fetch_chapter(genesis(), 1, &config)
            .expect("can fetch chapter");

        assert_eq!(verses.len(), 3);
        assert_eq!(verses[0].reference(), "Genesis 1:1");
        assert_eq!(verses[2].number, 3);
        assert_eq!(verses[0].hebrew, "עברית Genesis.1 1");
        assert_eq!(
            verses[0].translation(Translation::Default),
            Some("English Genesis.1 1")
        );
    }

    #[test]
    fn can_fetch_book_in_order() {
        let config = quick_config();
        let api = FakeApi::with_verses(2);
        let mut fetcher = Fetcher::new(api, &config.api);
        let verses = fetcher
            .fetch_book(genesis(), 1..=3, &config, &ProgressBar::hidden())
            .expect("can fetch book");

        let references: Vec<_> = verses.iter().map(Verse::reference).collect();
        assert_eq!(
            references,
            vec![
                "Genesis 1:1",
                "Genesis 1:2",
                "Genesis 2:1",
                "Genesis 2:2",
                "Genesis 3:1",
                "Genesis 3:2"
            ]
        );
    }

    #[test]
    fn retries_transient_failures() {
        let config = quick_config();
        let api = FakeApi::new(|path, previous| {
            if previous < 2 {
                Err(FetchError::Status {
                    url: path.to_string(),
                    status: 503,
                })
            } else {
                Ok(chapter_body(path, 1))
            }
        });
        let mut fetcher = Fetcher::new(api, &config.api);
        let verses = fetcher
            .fetch_chapter(genesis(), 1, &config)
            .expect("succeeds after retries");
        assert_eq!(verses.len(), 1);
        assert_eq!(fetcher.api.calls_to("api/texts/Genesis.1"), 3);
    }

    #[test]
    fn retries_are_bounded() {
        let config = quick_config();
        let api = FakeApi::new(|path, _| {
            Err(FetchError::Timeout {
                url: path.to_string(),
            })
        });
        let mut fetcher = Fetcher::new(api, &config.api);
        let result = fetcher.fetch_chapter(genesis(), 1, &config);
        assert!(matches!(result, Err(FetchError::Timeout { .. })));
        assert_eq!(
            fetcher.api.calls_to("api/texts/Genesis.1"),
            1 + config.api.max_retries as usize
        );
    }

    #[test]
    fn does_not_retry_permanent_failures() {
        let config = quick_config();
        let api = FakeApi::new(|path, _| {
            Err(FetchError::Status {
                url: path.to_string(),
                status: 400,
            })
        });
        let mut fetcher = Fetcher::new(api, &config.api);
        let result = fetcher.fetch_chapter(genesis(), 1, &config);
        assert!(matches!(result, Err(FetchError::Status { status: 400, .. })));
        assert_eq!(fetcher.api.calls_to("api/texts/Genesis.1"), 1);
    }

    #[test]
    fn malformed_response_is_a_fetch_error() {
        let config = quick_config();
        let api = FakeApi::new(|_, _| Ok(json!({ "he": 7 })));
        let mut fetcher = Fetcher::new(api, &config.api);
        let result = fetcher.fetch_chapter(genesis(), 1, &config);
        assert!(matches!(result, Err(FetchError::UnexpectedShape { .. })));
    }

    #[test]
    fn attaches_commentary_when_enabled() {
        let mut config = quick_config();
        config.include_commentary = true;
        let api = FakeApi::new(|path, _| {
            if path.starts_with("api/texts/Rashi_on_") {
                Ok(json!({ "he": [["פירוש"], []] }))
            } else {
                Ok(chapter_body(path, 2))
            }
        });
        let mut fetcher = Fetcher::new(api, &config.api);
        let verses = fetcher
            .fetch_chapter(genesis(), 1, &config)
            .expect("can fetch chapter");
        assert_eq!(verses[0].commentary.as_deref(), Some("פירוש"));
        assert_eq!(verses[1].commentary, None);
        assert_eq!(fetcher.api.calls_to("api/texts/Rashi_on_Genesis.1"), 1);
    }

    #[test]
    fn missing_commentary_is_not_fatal() {
        let mut config = quick_config();
        config.include_commentary = true;
        let api = FakeApi::new(|path, _| {
            if path.starts_with("api/texts/Rashi_on_") {
                Err(FetchError::Status {
                    url: path.to_string(),
                    status: 404,
                })
            } else {
                Ok(chapter_body(path, 2))
            }
        });
        let mut fetcher = Fetcher::new(api, &config.api);
        let verses = fetcher
            .fetch_chapter(genesis(), 1, &config)
            .expect("can fetch chapter");
        assert!(verses.iter().all(|v| v.commentary.is_none()));
    }

    #[test]
    fn skips_commentary_when_disabled() {
        let config = quick_config();
        let api = FakeApi::with_verses(1);
        let mut fetcher = Fetcher::new(api, &config.api);
        fetcher
            .fetch_chapter(genesis(), 1, &config)
            .expect("can fetch chapter");
        assert_eq!(fetcher.api.calls_to("api/texts/Rashi_on_Genesis.1"), 0);
    }

    #[test]
    fn waits_between_requests() {
        let mut config = quick_config();
        config.api.request_delay_ms = 40;
        let started = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&started);
        let api = FakeApi::new(move |path, previous| {
            recorded.borrow_mut().push(Instant::now());
            if path == "api/texts/Genesis.1" && previous == 0 {
                Err(FetchError::Timeout {
                    url: path.to_string(),
                })
            } else {
                Ok(chapter_body(path, 1))
            }
        });
        let mut fetcher = Fetcher::new(api, &config.api);
        fetcher
            .fetch_book(genesis(), 1..=2, &config, &ProgressBar::hidden())
            .expect("can fetch book");

        // a failed attempt, its retry, then chapter 2
        let started = started.borrow();
        assert_eq!(started.len(), 3);
        for pair in started.windows(2) {
            assert!(pair[1].duration_since(pair[0]) >= Duration::from_millis(40));
        }
    }

    #[test]
    fn backoff_doubles() {
        let api = ApiConfig {
            backoff_ms: 100,
            ..ApiConfig::default()
        };
        assert_eq!(api.backoff(1), Duration::from_millis(100));
        assert_eq!(api.backoff(2), Duration::from_millis(200));
        assert_eq!(api.backoff(3), Duration::from_millis(400));
    }

    #[test]
    fn classifies_transient_errors() {
        let url = "x".to_string();
        assert!(FetchError::Timeout { url: url.clone() }.is_transient());
        assert!(FetchError::RateLimited { url: url.clone() }.is_transient());
        assert!(FetchError::Status { url: url.clone(), status: 502 }.is_transient());
        assert!(!FetchError::Status { url: url.clone(), status: 404 }.is_transient());
        assert!(!FetchError::UnexpectedShape {
            reference: url,
            reason: String::new()
        }
        .is_transient());
    }
}
