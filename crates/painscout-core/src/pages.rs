//! Fetched page content and the light-weight HTML helpers run over it.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("valid script regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*?</style\s*>").expect("valid style regex"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").expect("valid anchor regex"));
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bhref\s*=\s*["']([^"']+)["']"#).expect("valid href regex")
});

/// Raw content of one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// Final URL the content was served from.
    pub url: String,
    pub html: String,
}

/// An anchor found on a page, resolved to an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub url: String,
    /// Lowercased, whitespace-collapsed anchor text.
    pub text: String,
}

impl PageLink {
    /// Lowercased URL and anchor text joined, for keyword matching.
    #[must_use]
    pub fn haystack(&self) -> String {
        format!("{} {}", self.url.to_lowercase(), self.text)
    }
}

impl PageContent {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    #[must_use]
    pub fn is_https(&self) -> bool {
        self.url.to_ascii_lowercase().starts_with("https://")
    }

    /// `true` when the payload carries NUL bytes, i.e. a binary body served as HTML.
    #[must_use]
    pub fn looks_binary(&self) -> bool {
        self.html.contains('\0')
    }

    /// Visible text: scripts, styles, comments and tags removed, entities
    /// decoded, whitespace collapsed, lowercased.
    #[must_use]
    pub fn text(&self) -> String {
        visible_text(&self.html)
    }

    /// Lowercased raw markup, for structural checks on attributes and assets.
    #[must_use]
    pub fn markup(&self) -> String {
        self.html.to_lowercase()
    }

    #[must_use]
    pub fn links(&self) -> Vec<PageLink> {
        extract_links(&self.html, &self.url)
    }
}

/// The set of pages fetched for one organization. Any page may be missing.
#[derive(Debug, Clone, Default)]
pub struct FetchedPages {
    pub home: Option<PageContent>,
    pub pricing: Option<PageContent>,
    pub portal: Option<PageContent>,
    pub failures: Vec<PageFailure>,
}

impl FetchedPages {
    /// Present pages in home, pricing, portal order.
    pub fn present(&self) -> impl Iterator<Item = &PageContent> {
        [&self.home, &self.pricing, &self.portal]
            .into_iter()
            .filter_map(Option::as_ref)
    }

    /// Links found on the home page, or none if it was not fetched.
    #[must_use]
    pub fn home_links(&self) -> Vec<PageLink> {
        self.home.as_ref().map(PageContent::links).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRole {
    Home,
    Pricing,
    Portal,
}

impl std::fmt::Display for PageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageRole::Home => write!(f, "home"),
            PageRole::Pricing => write!(f, "pricing"),
            PageRole::Portal => write!(f, "portal"),
        }
    }
}

/// A page that could not be fetched. Recorded, never fatal on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub role: PageRole,
    pub url: String,
    pub reason: String,
}

#[must_use]
pub fn visible_text(html: &str) -> String {
    let stripped = SCRIPT_RE.replace_all(html, " ");
    let stripped = STYLE_RE.replace_all(&stripped, " ");
    let stripped = COMMENT_RE.replace_all(&stripped, " ");
    let stripped = TAG_RE.replace_all(&stripped, " ");
    let decoded = decode_entities(&stripped);
    WS_RE.replace_all(&decoded, " ").trim().to_lowercase()
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&copy;", "©")
        .replace("&#169;", "©")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Extract anchors from `html`, resolving relative hrefs against `base_url`.
///
/// Fragment-only, `mailto:`, `tel:` and `javascript:` links are dropped.
#[must_use]
pub fn extract_links(html: &str, base_url: &str) -> Vec<PageLink> {
    ANCHOR_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let attrs = cap.get(1)?.as_str();
            let href = HREF_RE.captures(attrs)?.get(1)?.as_str().trim();
            let lower = href.to_ascii_lowercase();
            if href.is_empty()
                || href.starts_with('#')
                || lower.starts_with("mailto:")
                || lower.starts_with("tel:")
                || lower.starts_with("javascript:")
            {
                return None;
            }
            let url = resolve_url(base_url, href)?;
            let text = visible_text(cap.get(2).map_or("", |m| m.as_str()));
            Some(PageLink { url, text })
        })
        .collect()
}

/// Resolve `href` against the page at `base_url`. Only http(s) results are kept.
#[must_use]
pub fn resolve_url(base_url: &str, href: &str) -> Option<String> {
    let url = Url::parse(base_url).ok()?.join(href).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

/// Lowercased host of an absolute URL with any `www.` prefix and port removed.
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// Lowercased path of an absolute URL, without query or fragment.
#[must_use]
pub fn path_of(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|u| u.path().to_ascii_lowercase())
}
