// ABOUTME: Stylesheet and script resources for generated pages
// ABOUTME: Links or embeds local and remote CSS/JS, fetching remote files with retries

use crate::errors::{Result, SiteError};
use log::{info, warn};
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;

const FETCH_ATTEMPTS: u32 = 3;

/// Kind of tag a resource is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Css,
    Js,
}

/// A stylesheet or script referenced by a generated page.
#[derive(Debug, Clone)]
pub struct ResourceFile {
    pub path: String,
    pub kind: ResourceKind,
    pub is_remote: bool,
}

impl ResourceFile {
    /// Create a resource from a local path or an http(s) URL.
    pub fn new(path: &str, kind: ResourceKind) -> Self {
        let is_remote = path.starts_with("http://") || path.starts_with("https://");
        Self {
            path: path.to_string(),
            kind,
            is_remote,
        }
    }

    pub fn css(path: &str) -> Self {
        Self::new(path, ResourceKind::Css)
    }

    pub fn js(path: &str) -> Self {
        Self::new(path, ResourceKind::Js)
    }

    /// Read the resource from disk or fetch it from its URL.
    pub fn content(&self) -> Result<String> {
        if self.is_remote {
            self.fetch_remote_content()
        } else {
            self.read_local_content()
        }
    }

    fn fetch_remote_content(&self) -> Result<String> {
        info!("Fetching remote resource: {}", self.path);

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        let mut retry_delay = 1000;
        let mut last_error = None;

        for attempt in 1..=FETCH_ATTEMPTS {
            match client.get(&self.path).send() {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.text()?);
                }
                Ok(response) => {
                    last_error = Some(SiteError::ValidationError(format!(
                        "HTTP error: {}",
                        response.status()
                    )));
                }
                Err(e) => last_error = Some(SiteError::FetchError(e)),
            }

            if attempt < FETCH_ATTEMPTS {
                warn!(
                    "Fetch attempt {} for {} failed, retrying in {} ms",
                    attempt, self.path, retry_delay
                );
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SiteError::ValidationError("Unknown error fetching resource".to_string())
        }))
    }

    fn read_local_content(&self) -> Result<String> {
        info!("Reading local resource: {}", self.path);
        let path = Path::new(&self.path);
        if !path.exists() {
            return Err(SiteError::PathNotFoundError(path.to_path_buf()));
        }

        Ok(fs::read_to_string(path)?)
    }

    /// Render the resource as a tag.
    ///
    /// Local resources are inlined when `embed` is set; remote ones are
    /// inlined only when `fetch_remote` is also set, otherwise linked.
    pub fn tag(&self, embed: bool, fetch_remote: bool) -> Result<String> {
        if !embed || (self.is_remote && !fetch_remote) {
            return Ok(self.link_tag());
        }

        let content = self.content()?;
        Ok(match self.kind {
            ResourceKind::Css => format!("<style>{}</style>", content),
            ResourceKind::Js => format!("<script>{}</script>", content),
        })
    }

    /// Render the resource as a reference to its path.
    pub fn link_tag(&self) -> String {
        match self.kind {
            ResourceKind::Css => format!(r#"<link rel="stylesheet" href="{}">"#, self.path),
            ResourceKind::Js => format!(r#"<script src="{}"></script>"#, self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_remote_resources_are_linked() {
        let css = ResourceFile::css("https://example.com/style.css");
        assert!(css.is_remote);
        assert_eq!(
            css.tag(true, false).unwrap(),
            r#"<link rel="stylesheet" href="https://example.com/style.css">"#
        );

        let js = ResourceFile::js("https://example.com/script.js");
        assert_eq!(
            js.tag(true, false).unwrap(),
            r#"<script src="https://example.com/script.js"></script>"#
        );
    }

    #[test]
    fn test_local_resource_is_embedded() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"body { margin: 0; }")
            .expect("Failed to write to temp file");

        let css = ResourceFile::css(file.path().to_str().unwrap());
        assert_eq!(
            css.tag(true, false).unwrap(),
            "<style>body { margin: 0; }</style>"
        );
        assert!(css.tag(false, false).unwrap().starts_with("<link"));
    }

    #[test]
    fn test_missing_local_resource() {
        let js = ResourceFile::js("/definitely/not/here.js");
        assert!(matches!(
            js.tag(true, false),
            Err(SiteError::PathNotFoundError(_))
        ));
    }
}
