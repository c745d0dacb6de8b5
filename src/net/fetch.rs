use std::time::Duration;

use url::Url;

/// Portfolio pages are small; anything past this is not one.
pub const MAX_PAGE_BYTES: usize = 8 * 1024 * 1024;

const TIMEOUT: Duration = Duration::from_secs(15);
const MAX_REDIRECTS: usize = 10;

/// A downloaded page.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub html: String,
    /// Final URL after redirects.
    pub url: String,
    pub content_type: String,
}

/// Error while loading a page
#[derive(Debug)]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FetchError {}

/// Whether a `Content-Type` header names an HTML document. A missing
/// header is given the benefit of the doubt.
pub fn is_html(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(value) => {
            let mime = value.split(';').next().unwrap_or("").trim();
            mime.eq_ignore_ascii_case("text/html")
                || mime.eq_ignore_ascii_case("application/xhtml+xml")
        }
    }
}

/// Download an `http(s)` page (blocking).
pub fn fetch_url(url_str: &str) -> Result<FetchResult, FetchError> {
    let parsed = Url::parse(url_str).map_err(|e| FetchError::new(format!("Invalid URL: {}", e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::new(format!(
            "Unsupported scheme '{}' in {}",
            parsed.scheme(),
            parsed
        )));
    }

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("tag-lens/", env!("CARGO_PKG_VERSION")))
        .timeout(TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| FetchError::new(format!("Client error: {}", e)))?;

    let response = client
        .get(parsed.clone())
        .header("Accept", "text/html,application/xhtml+xml;q=0.9")
        .send()
        .map_err(|e| FetchError::new(format!("Request to {} failed: {}", parsed, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::new(format!("{} returned HTTP {}", parsed, status.as_u16())));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if !is_html(content_type.as_deref()) {
        return Err(FetchError::new(format!(
            "{} is not an HTML page ({})",
            parsed,
            content_type.unwrap_or_default()
        )));
    }
    if response
        .content_length()
        .is_some_and(|len| len as usize > MAX_PAGE_BYTES)
    {
        return Err(FetchError::new(format!("{} is larger than {} bytes", parsed, MAX_PAGE_BYTES)));
    }

    let final_url = response.url().to_string();
    let html = response
        .text()
        .map_err(|e| FetchError::new(format!("Failed to read body of {}: {}", final_url, e)))?;
    if html.len() > MAX_PAGE_BYTES {
        return Err(FetchError::new(format!("{} is larger than {} bytes", final_url, MAX_PAGE_BYTES)));
    }

    log::debug!("Fetched {} ({} bytes)", final_url, html.len());
    Ok(FetchResult {
        html,
        url: final_url,
        content_type: content_type.unwrap_or_else(|| "text/html".into()),
    })
}
