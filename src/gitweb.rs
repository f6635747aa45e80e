//! Browser link construction
//!
//! Builds deep links into the host's web code browser for a project and
//! revision. The browser endpoint and revision template come from
//! configuration; `{project}` and `{commit}` placeholders in the template
//! are substituted after the project identifier is run through the
//! browser's path-separator rule and percent-encoded.
//!
//! Missing configuration is a soft outcome ([`LinkOutcome::Unavailable`]),
//! not an error: hosts that never configured a code browser simply get no
//! link actions. Malformed templates and non-encodable projects are hard
//! errors for the current dispatch.

use crate::settings::Settings;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Default gitweb revision template
pub const DEFAULT_REVISION_TEMPLATE: &str = "?p={project};a=commit;h={commit}";

/// Hard failures while constructing a link
#[derive(Debug, Error)]
pub enum LinkError {
    /// The revision template has an unterminated or unknown placeholder
    #[error("malformed revision template {template:?}: {detail}")]
    MalformedTemplate { template: String, detail: String },

    /// The project identifier cannot be ASCII-encoded for the URL
    #[error("project {project:?} is not ASCII-encodable")]
    NonAsciiProject { project: String },

    /// The assembled URL does not parse
    #[error("constructed URL {url:?} is not valid: {detail}")]
    MalformedUrl { url: String, detail: String },
}

/// How the web code browser is reached.
///
/// Mirrors the host's browser configuration: an endpoint (absolute, or a
/// path relative to the canonical base URL), a revision-view template, and
/// the browser's own rule for path separators in project names.
pub trait BrowserUrls: Send + Sync {
    /// The browser endpoint, if one is configured
    fn url(&self) -> Option<String>;

    /// Template for a revision view, with `{project}` and `{commit}`
    /// placeholders
    fn revision_template(&self) -> String;

    /// Apply the browser's path-separator substitution to a project name
    fn replace_path_separator(&self, project: &str) -> String;
}

/// Browser settings for a gitweb-style code browser.
#[derive(Debug, Clone)]
pub struct GitwebConfig {
    url: Option<String>,
    revision_template: String,
    path_separator: Option<char>,
}

impl Default for GitwebConfig {
    fn default() -> Self {
        Self {
            url: None,
            revision_template: DEFAULT_REVISION_TEMPLATE.to_string(),
            path_separator: None,
        }
    }
}

impl GitwebConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `gitweb` section of the settings store.
    pub fn from_settings(settings: &dyn Settings) -> Self {
        Self {
            url: settings.string("gitweb", "url"),
            revision_template: settings
                .string("gitweb", "revision_template")
                .unwrap_or_else(|| DEFAULT_REVISION_TEMPLATE.to_string()),
            path_separator: settings
                .string("gitweb", "path_separator")
                .and_then(|s| s.chars().next()),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_revision_template(mut self, template: impl Into<String>) -> Self {
        self.revision_template = template.into();
        self
    }

    pub fn with_path_separator(mut self, separator: char) -> Self {
        self.path_separator = Some(separator);
        self
    }
}

impl BrowserUrls for GitwebConfig {
    fn url(&self) -> Option<String> {
        self.url.clone()
    }

    fn revision_template(&self) -> String {
        self.revision_template.clone()
    }

    fn replace_path_separator(&self, project: &str) -> String {
        match self.path_separator {
            Some(sep) => project.replace('/', &sep.to_string()),
            None => project.to_string(),
        }
    }
}

/// A resolved link ready to hand to the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    /// Absolute URL into the code browser
    pub url: String,

    /// Display label for the link
    pub label: String,
}

/// Why no link could be built from the current configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// `host.canonical_web_url` is not set
    CanonicalUrlMissing,

    /// The browser has no configured endpoint
    BrowserUrlMissing,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CanonicalUrlMissing => write!(f, "no canonical web URL configured"),
            Self::BrowserUrlMissing => write!(f, "no browser URL configured"),
        }
    }
}

/// Outcome of one link construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A usable link
    Resolved(LinkTarget),

    /// Configuration does not allow building a link; the caller logs the
    /// reason and skips every link-dependent action for this event
    Unavailable(UnavailableReason),
}

/// Builds browser links from the live configuration.
///
/// The canonical base URL and browser endpoint are re-read on every call,
/// matching the per-event freshness of the gate flags.
pub struct LinkBuilder {
    settings: Arc<dyn Settings>,
    browser: Arc<dyn BrowserUrls>,
}

impl LinkBuilder {
    pub fn new(settings: Arc<dyn Settings>, browser: Arc<dyn BrowserUrls>) -> Self {
        Self { settings, browser }
    }

    /// Construct the browser link for a project and revision.
    ///
    /// `label` becomes the link's display label. Returns
    /// [`LinkOutcome::Unavailable`] when the canonical base URL or the
    /// browser endpoint is not configured.
    pub fn build(
        &self,
        project: &str,
        revision: &str,
        label: impl Into<String>,
    ) -> Result<LinkOutcome, LinkError> {
        let Some(mut canonical) = self.settings.string("host", "canonical_web_url") else {
            return Ok(LinkOutcome::Unavailable(UnavailableReason::CanonicalUrlMissing));
        };
        if !canonical.ends_with('/') {
            canonical.push('/');
        }

        let Some(mut browser_url) = self.browser.url() else {
            return Ok(LinkOutcome::Unavailable(UnavailableReason::BrowserUrlMissing));
        };
        if !browser_url.starts_with("http") {
            browser_url = format!("{}{}", canonical, browser_url);
        }

        let project = self.browser.replace_path_separator(project);
        if !project.is_ascii() {
            return Err(LinkError::NonAsciiProject { project });
        }
        let encoded = urlencoding::encode(&project);

        let template = self.browser.revision_template();
        let view = substitute(&template, encoded.as_ref(), revision)?;

        let url = format!("{}{}", browser_url, view);
        reqwest::Url::parse(&url).map_err(|e| LinkError::MalformedUrl {
            url: url.clone(),
            detail: e.to_string(),
        })?;

        Ok(LinkOutcome::Resolved(LinkTarget {
            url,
            label: label.into(),
        }))
    }
}

/// Substitute `{project}` and `{commit}` placeholders in a template.
fn substitute(template: &str, project: &str, commit: &str) -> Result<String, LinkError> {
    let mut out = String::with_capacity(template.len() + project.len() + commit.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            return Err(LinkError::MalformedTemplate {
                template: template.to_string(),
                detail: "unterminated placeholder".to_string(),
            });
        };
        match &after[..end] {
            "project" => out.push_str(project),
            "commit" => out.push_str(commit),
            other => {
                return Err(LinkError::MalformedTemplate {
                    template: template.to_string(),
                    detail: format!("unknown placeholder {{{}}}", other),
                })
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}
