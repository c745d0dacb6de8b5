//! Page sources: local files or `http(s)` URLs.

#[cfg(feature = "fetch")]
pub mod fetch;

use std::path::Path;

use url::Url;

use crate::dom::parser::parse_html;
use crate::dom::Document;

#[cfg(feature = "fetch")]
pub use fetch::FetchError;

#[cfg(not(feature = "fetch"))]
#[derive(Debug)]
pub struct FetchError {
    pub message: String,
}

#[cfg(not(feature = "fetch"))]
impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(not(feature = "fetch"))]
impl std::error::Error for FetchError {}

/// Where a page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    Remote(Url),
    Local(String),
}

impl PageSource {
    /// `http://` and `https://` are remote, anything else is a path.
    pub fn parse(input: &str) -> Self {
        match Url::parse(input) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => PageSource::Remote(url),
            _ => PageSource::Local(input.to_string()),
        }
    }

    /// Read and parse the page.
    pub fn load(&self) -> Result<Document, FetchError> {
        match self {
            PageSource::Local(path) => {
                let html = std::fs::read_to_string(Path::new(path)).map_err(|e| FetchError {
                    message: format!("Cannot read {}: {}", path, e),
                })?;
                Ok(parse_html(&html, &format!("file://{}", path)))
            }
            #[cfg(feature = "fetch")]
            PageSource::Remote(url) => {
                let result = fetch::fetch_url(url.as_str())?;
                Ok(parse_html(&result.html, &result.url))
            }
            #[cfg(not(feature = "fetch"))]
            PageSource::Remote(url) => Err(FetchError {
                message: format!("Cannot fetch {}: built without the 'fetch' feature", url),
            }),
        }
    }
}

impl std::fmt::Display for PageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageSource::Remote(url) => write!(f, "{}", url),
            PageSource::Local(path) => write!(f, "{}", path),
        }
    }
}
