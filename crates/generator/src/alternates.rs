//! Standalone sitemap with per-URL alternate-language links.
//!
//! Works from a hand-maintained list of paths rather than the page inventory,
//! so it can drift from what `render_site` produces.
//!
//! ```xml
//! <url>
//!   <loc>https://example.com/en/a.html</loc>
//!   <lastmod>2025-01-01T00:00:00+00:00</lastmod>
//!   <changefreq>weekly</changefreq>
//!   <priority>0.8</priority>
//!   <xhtml:link rel="alternate" hreflang="en" href="https://example.com/en/a.html" />
//!   <xhtml:link rel="alternate" hreflang="ar" href="https://example.com/ar/a.html" />
//! </url>
//! ```

use crate::seo::{SITEMAP_NS, escape_xml};
use chrono::{DateTime, Utc};
use storefront_kit_core::Language;

const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
const CHANGEFREQ: &str = "weekly";
const PRIORITY: &str = "0.8";

pub const DEFAULT_BASE: &str = "https://alforsa.sa";

pub const DEFAULT_PATHS: &[&str] = &[
    "/",
    "/en/",
    "/ar/",
    "/en/product-mini.html",
    "/ar/product-mini.html",
];

/// How a site path relates to the language prefixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathKind<'a> {
    /// `/`
    Root,
    /// First segment is a language code; `rest` is everything after `/<lang>/`
    Localized { lang: Language, rest: &'a str },
    /// Anything else, treated as the same document under every language
    Unprefixed(&'a str),
}

impl<'a> PathKind<'a> {
    pub fn classify(path: &'a str) -> Self {
        let trimmed = path.trim_start_matches('/');
        if trimmed.is_empty() {
            return PathKind::Root;
        }

        let (first, rest) = trimmed.split_once('/').unwrap_or((trimmed, ""));
        match Language::from_code(first) {
            Some(lang) => PathKind::Localized { lang, rest },
            None => PathKind::Unprefixed(trimmed),
        }
    }

    /// Path of this document in `lang`
    pub fn variant(&self, lang: Language) -> String {
        match self {
            PathKind::Root => format!("/{}/", lang.code()),
            PathKind::Localized { rest, .. } | PathKind::Unprefixed(rest) => {
                format!("/{}/{}", lang.code(), rest)
            }
        }
    }
}

pub struct AlternateSitemap {
    base: String,
    paths: Vec<String>,
}

impl AlternateSitemap {
    pub fn new(base: &str, paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            paths: paths
                .into_iter()
                .map(|p| {
                    let p: String = p.into();
                    if p.starts_with('/') { p } else { format!("/{p}") }
                })
                .collect(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BASE, DEFAULT_PATHS.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Generate sitemap XML string.
    pub fn to_xml(&self, now: DateTime<Utc>) -> String {
        let lastmod = now.format("%Y-%m-%dT%H:%M:%S+00:00");
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<urlset xmlns="{SITEMAP_NS}" xmlns:xhtml="{XHTML_NS}">"#
        ));
        xml.push('\n');

        for path in &self.paths {
            let kind = PathKind::classify(path);
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&self.url(path))));
            xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            xml.push_str(&format!("    <changefreq>{CHANGEFREQ}</changefreq>\n"));
            xml.push_str(&format!("    <priority>{PRIORITY}</priority>\n"));
            for lang in Language::ALL {
                xml.push_str(&format!(
                    "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\" />\n",
                    lang.code(),
                    escape_xml(&self.url(&kind.variant(lang)))
                ));
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}
