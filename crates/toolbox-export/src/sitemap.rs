//! Sitemap (protocol 0.9) serializer.
//!
//! The site is static: one page for the home route, one per category and
//! one per tool. [`entries_from_registry`] lists them in navigation order
//! and [`to_sitemap`] renders the XML document.
//!
//! Pure functions with no I/O; the document is returned as a `String`.

use std::fmt::{self, Write};

use toolbox_core::age::parse_date;
use toolbox_core::registry::{self, Category};

/// Errors from [`to_sitemap`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SitemapError {
    /// Base URL is not an absolute `http`/`https` URL.
    #[error("base URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),

    /// `lastmod` is not a `YYYY-MM-DD` date.
    #[error("lastmod must be a YYYY-MM-DD date, got {0:?}")]
    InvalidLastmod(String),
}

/// `<changefreq>` hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        })
    }
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Route relative to the base URL, starting with `/`.
    pub path: String,
    pub changefreq: ChangeFreq,
    /// Relative priority in `[0, 1]`.
    pub priority: f32,
    /// `YYYY-MM-DD` date of last modification.
    pub lastmod: Option<String>,
}

impl SitemapEntry {
    #[must_use]
    pub fn new(path: impl Into<String>, changefreq: ChangeFreq, priority: f32) -> Self {
        Self {
            path: path.into(),
            changefreq,
            priority,
            lastmod: None,
        }
    }
}

/// Entries for every page: home, category indexes, then tools.
///
/// `lastmod` is applied to all of them.
#[must_use]
pub fn entries_from_registry(lastmod: Option<&str>) -> Vec<SitemapEntry> {
    let home = SitemapEntry::new("/", ChangeFreq::Weekly, 1.0);
    let categories = Category::ALL
        .into_iter()
        .map(|c| SitemapEntry::new(c.path(), ChangeFreq::Weekly, 0.8));
    let tools = registry::tools()
        .iter()
        .map(|t| SitemapEntry::new(t.path, ChangeFreq::Monthly, 0.6));

    std::iter::once(home)
        .chain(categories)
        .chain(tools)
        .map(|mut entry| {
            entry.lastmod = lastmod.map(str::to_owned);
            entry
        })
        .collect()
}

/// Render `entries` as a sitemap rooted at `base_url`.
///
/// A trailing `/` on `base_url` is ignored. Locations are XML-escaped and
/// priorities are clamped to `[0, 1]` with one decimal.
///
/// # Errors
///
/// Returns [`SitemapError::InvalidBaseUrl`] when `base_url` is not an
/// `http` or `https` URL with a host, and [`SitemapError::InvalidLastmod`]
/// when an entry's `lastmod` is not a calendar date.
pub fn to_sitemap(base_url: &str, entries: &[SitemapEntry]) -> Result<String, SitemapError> {
    let base = base_url.trim().trim_end_matches('/');
    let host = base
        .strip_prefix("https://")
        .or_else(|| base.strip_prefix("http://"));
    if host.is_none_or(str::is_empty) {
        return Err(SitemapError::InvalidBaseUrl(base_url.to_owned()));
    }

    let mut out = String::new();
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#
    );
    for entry in entries {
        let _ = writeln!(out, "  <url>");
        let _ = writeln!(out, "    <loc>{}</loc>", escape(&format!("{base}{}", entry.path)));
        if let Some(lastmod) = &entry.lastmod {
            let date =
                parse_date(lastmod).map_err(|_| SitemapError::InvalidLastmod(lastmod.clone()))?;
            let _ = writeln!(out, "    <lastmod>{date}</lastmod>");
        }
        let _ = writeln!(out, "    <changefreq>{}</changefreq>", entry.changefreq);
        let _ = writeln!(
            out,
            "    <priority>{:.1}</priority>",
            entry.priority.clamp(0.0, 1.0)
        );
        let _ = writeln!(out, "  </url>");
    }
    let _ = writeln!(out, "</urlset>");
    Ok(out)
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn one_entry_per_page() {
        let entries = entries_from_registry(None);
        assert_eq!(entries.len(), 1 + Category::ALL.len() + registry::tools().len());
        assert_eq!(entries[0].path, "/");
        assert_eq!(entries[1].path, "/image");
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let entries = [SitemapEntry::new("/text/uppercase", ChangeFreq::Monthly, 0.6)];
        let xml = to_sitemap("https://tools.example/", &entries).unwrap();
        assert!(xml.contains("<loc>https://tools.example/text/uppercase</loc>"));
    }

    #[test]
    fn locations_are_escaped() {
        let entries = [SitemapEntry::new("/search?q=a&b", ChangeFreq::Daily, 0.5)];
        let xml = to_sitemap("http://tools.example", &entries).unwrap();
        assert!(xml.contains("<loc>http://tools.example/search?q=a&amp;b</loc>"));
    }

    #[test]
    fn lastmod_is_optional() {
        let mut entry = SitemapEntry::new("/", ChangeFreq::Weekly, 1.0);
        let xml = to_sitemap("https://tools.example", std::slice::from_ref(&entry)).unwrap();
        assert!(!xml.contains("<lastmod>"));

        entry.lastmod = Some("2026-10-19".into());
        let xml = to_sitemap("https://tools.example", &[entry]).unwrap();
        assert!(xml.contains("<lastmod>2026-10-19</lastmod>"));
    }

    #[test]
    fn lastmod_must_be_a_date() {
        for bad in ["yesterday", "2026-13-01", "2026-02-30", "<b>"] {
            let mut entry = SitemapEntry::new("/", ChangeFreq::Weekly, 1.0);
            entry.lastmod = Some(bad.into());
            assert_eq!(
                to_sitemap("https://tools.example", &[entry]),
                Err(SitemapError::InvalidLastmod(bad.to_owned())),
                "{bad}"
            );
        }

        let entries = entries_from_registry(Some(" 2026-10-19 "));
        let xml = to_sitemap("https://tools.example", &entries).unwrap();
        assert!(xml.contains("<lastmod>2026-10-19</lastmod>"));
    }

    #[test]
    fn priority_is_clamped() {
        let entries = [SitemapEntry::new("/", ChangeFreq::Weekly, 3.0)];
        let xml = to_sitemap("https://tools.example", &entries).unwrap();
        assert!(xml.contains("<priority>1.0</priority>"));
    }

    #[test]
    fn base_url_must_be_http() {
        for base in ["tools.example", "ftp://tools.example", "https://", ""] {
            assert_eq!(
                to_sitemap(base, &[]),
                Err(SitemapError::InvalidBaseUrl(base.to_owned())),
                "{base}"
            );
        }
    }
}
