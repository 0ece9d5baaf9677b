//! Remote template assets
//!
//! License texts come from the GitHub licenses API and ignore files from the
//! github/gitignore repository. Successful fetches are cached on disk so later
//! projects can be created offline.

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Source of static texts written into new projects
pub trait AssetSource {
    /// License text for a license key such as `mit`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] if the text cannot be obtained.
    fn license(&self, id: &str) -> Result<String>;

    /// Ignore-file text for a template name such as `Python`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] if the text cannot be obtained.
    fn gitignore(&self, id: &str) -> Result<String>;
}

/// Asset source backed by blocking HTTP requests
#[derive(Debug)]
pub struct HttpAssetSource {
    client: reqwest::blocking::Client,
    license_url: String,
    gitignore_url: String,
    cache_dir: Option<PathBuf>,
}

impl HttpAssetSource {
    /// Create a source for the given URL templates
    ///
    /// Both URLs must contain an `{id}` placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] if the HTTP client cannot be built.
    pub fn new(
        license_url: impl Into<String>,
        gitignore_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("culting/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Fetch(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            license_url: license_url.into(),
            gitignore_url: gitignore_url.into(),
            cache_dir: None,
        })
    }

    /// Cache fetched texts under `dir`
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    fn cached_or_fetch(
        &self,
        kind: &str,
        id: &str,
        url_template: &str,
        parse: fn(&str) -> Result<String>,
    ) -> Result<String> {
        let id = sanitize_id(id)?;
        let cache_path = self
            .cache_dir
            .as_ref()
            .map(|dir| dir.join(kind).join(&id));

        if let Some(path) = &cache_path
            && let Ok(text) = fs::read_to_string(path)
        {
            tracing::debug!(path = %path.display(), "Using cached {kind}");
            return Ok(text);
        }

        let url = url_template.replace("{id}", &id);
        let body = self.get(&url)?;
        let text = parse(&body)?;

        if let Some(path) = &cache_path {
            // Cache misses are not fatal, the text is already in hand
            if let Err(e) = write_cache(path, &text) {
                tracing::warn!(path = %path.display(), "Failed to cache {kind}: {e}");
            }
        }
        Ok(text)
    }

    fn get(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "Fetching asset");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json, text/plain")
            .send()
            .map_err(|e| Error::Fetch(format!("Failed to GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("HTTP {status}: {url}")));
        }

        response
            .text()
            .map_err(|e| Error::Fetch(format!("Failed to read response from {url}: {e}")))
    }
}

impl AssetSource for HttpAssetSource {
    fn license(&self, id: &str) -> Result<String> {
        self.cached_or_fetch("license", id, &self.license_url, parse_license_payload)
    }

    fn gitignore(&self, id: &str) -> Result<String> {
        self.cached_or_fetch("gitignore", id, &self.gitignore_url, |body| {
            Ok(body.to_string())
        })
    }
}

/// Extract the license text from a licenses API payload
///
/// The API answers with a JSON object holding the text under `body`; any
/// other payload is taken verbatim so plain-text mirrors work too.
///
/// # Errors
///
/// Returns [`Error::Fetch`] for a JSON object without a string `body`.
pub fn parse_license_payload(payload: &str) -> Result<String> {
    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(serde_json::Value::Object(map)) => map
            .get("body")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::Fetch("License payload has no 'body' field".to_string())),
        _ => Ok(payload.to_string()),
    }
}

/// Asset ids end up in URLs and cache file names
fn sanitize_id(id: &str) -> Result<String> {
    let id = id.trim();
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+'))
        && !id.starts_with('.');
    if valid {
        Ok(id.to_string())
    } else {
        Err(Error::Fetch(format!("Invalid asset identifier '{id}'")))
    }
}

fn write_cache(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    Ok(())
}
