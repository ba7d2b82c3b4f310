//! Crawler-facing files: sitemap.xml, robots.txt, JSON-LD, verification stub, CNAME.

use crate::html::html_escape;
use chrono::NaiveDate;
use serde_json::json;
use storefront_kit_core::{BusinessProfile, Language, SiteConfig};

/// XML namespace for sitemap
pub(crate) const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Country code stamped into the PostalAddress
const ADDRESS_COUNTRY: &str = "SA";

/// Every URL the site sitemap lists, in order: the landing page under the
/// bare base URL and as index.html, both language homes, then both language
/// variants of each page.
pub(crate) fn sitemap_urls(config: &SiteConfig) -> Vec<String> {
    let business = &config.business;
    let mut urls = vec![
        business.absolute_url(""),
        business.absolute_url("index.html"),
    ];
    urls.extend(Language::ALL.iter().map(|lang| business.absolute_url(&lang.home_path())));
    for page in &config.pages {
        urls.extend(Language::ALL.iter().map(|&lang| business.absolute_url(&page.path(lang))));
    }
    urls
}

pub(crate) fn sitemap(config: &SiteConfig, today: NaiveDate) -> String {
    let lastmod = today.format("%Y-%m-%d");
    let mut xml = String::with_capacity(4096);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for url in sitemap_urls(config) {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url)));
        xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

pub(crate) fn robots(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\nSitemap: {}\n",
        config.business.absolute_url("sitemap.xml")
    )
}

/// schema.org LocalBusiness snippet. Non-ASCII text is written as-is.
pub(crate) fn local_business_json_ld(business: &BusinessProfile) -> String {
    let value = json!({
        "@context": "https://schema.org",
        "@type": "LocalBusiness",
        "name": business.name_en,
        "alternateName": business.name_ar,
        "description": business.description_en,
        "url": business.main_url,
        "telephone": business.phone,
        "currenciesAccepted": business.currency,
        "address": {
            "@type": "PostalAddress",
            "streetAddress": business.street_address,
            "addressCountry": ADDRESS_COUNTRY,
        }
    });
    // Serializing a json! value cannot fail
    let mut out = serde_json::to_string_pretty(&value).unwrap_or_default();
    out.push('\n');
    out
}

pub(crate) fn verification_stub(config: &SiteConfig) -> String {
    format!(
        "<html><head><meta name=\"google-site-verification\" content=\"{}\"></head><body>Google site verification file for {}</body></html>\n",
        html_escape(&config.site.verification_token),
        html_escape(&config.business.name_en)
    )
}

pub(crate) fn cname(config: &SiteConfig) -> String {
    format!("{}\n", config.site.custom_domain.trim())
}

/// Escape special XML characters.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{config_with_pages, sample_config};
    use std::collections::HashSet;

    #[test]
    fn test_sitemap_has_unique_entries_for_every_document() {
        let config = sample_config();
        let xml = sitemap(&config, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());

        let locs: Vec<&str> = xml
            .lines()
            .filter_map(|l| l.trim().strip_prefix("<loc>"))
            .filter_map(|l| l.strip_suffix("</loc>"))
            .collect();
        assert_eq!(locs.len(), 4 + 2 * config.pages.len());
        assert_eq!(locs.iter().collect::<HashSet<_>>().len(), locs.len());
        assert_eq!(locs[0], "https://alforsa.sa/");
        assert_eq!(locs[1], "https://alforsa.sa/index.html");
        assert_eq!(locs[4], "https://alforsa.sa/en/soft-serve-ice-cream-machine.html");

        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert_eq!(xml.matches("<lastmod>2025-03-09</lastmod>").count(), locs.len());
    }

    #[test]
    fn test_sitemap_empty_inventory() {
        let config = config_with_pages("https://example.com", &[]);
        assert_eq!(sitemap_urls(&config).len(), 4);
    }

    #[test]
    fn test_robots_points_at_sitemap() {
        assert_eq!(
            robots(&sample_config()),
            "User-agent: *\nAllow: /\nSitemap: https://alforsa.sa/sitemap.xml\n"
        );
    }

    #[test]
    fn test_json_ld_is_valid_and_unescaped() {
        let config = sample_config();
        let text = local_business_json_ld(&config.business);

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["@type"], "LocalBusiness");
        assert_eq!(value["address"]["addressCountry"], "SA");
        assert_eq!(value["address"]["@type"], "PostalAddress");
        assert_eq!(value["telephone"], "+966509995448");
        assert_eq!(value["currenciesAccepted"], "SAR");
        // Arabic stays readable rather than \u-escaped
        assert!(text.contains("الفرصة لمكائن الآيس كريم"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_verification_stub_and_cname() {
        let config = sample_config();
        let stub = verification_stub(&config);
        assert!(stub.contains(r#"<meta name="google-site-verification" content="replace_with_token">"#));
        assert_eq!(cname(&config), "alforsa.sa\n");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a&b<c>"), "a&amp;b&lt;c&gt;");
        assert_eq!(escape_xml("https://x.com/en/a.html"), "https://x.com/en/a.html");
    }
}
