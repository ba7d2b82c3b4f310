use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    business: BusinessProfile,
    #[serde(default)]
    site: RawSiteSettings,
    #[serde(default)]
    page: Vec<PageSpec>,
    #[serde(default)]
    publish: PublishSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSiteSettings {
    output_dir: Option<String>,
    archive: Option<String>,
    keywords: Vec<String>,
    custom_domain: Option<String>,
    verification_file: Option<String>,
    verification_token: Option<String>,
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let business = raw.business;
    if !(business.main_url.starts_with("https://") || business.main_url.starts_with("http://")) {
        return Err(Error::ConfigParse(format!(
            "business.main_url must start with http:// or https://, got '{}'",
            business.main_url
        )));
    }

    let mut seen = HashSet::new();
    for page in &raw.page {
        validate_slug(&page.slug)?;
        if !seen.insert(page.slug.as_str()) {
            return Err(Error::InvalidPage {
                slug: page.slug.clone(),
                reason: "slug appears more than once".to_string(),
            });
        }
    }

    let output_dir = validate_path(
        raw.site.output_dir.as_deref().unwrap_or("site"),
        "site.output_dir",
    )?;
    if output_dir.as_os_str().is_empty() {
        return Err(Error::ConfigParse(
            "site.output_dir must name a subdirectory of the project, not the project itself"
                .to_string(),
        ));
    }
    let archive = validate_path(raw.site.archive.as_deref().unwrap_or("site.zip"), "site.archive")?;
    if archive.as_os_str().is_empty() {
        return Err(Error::ConfigParse("site.archive must name a file".to_string()));
    }
    if archive.starts_with(&output_dir) {
        return Err(Error::ConfigParse(format!(
            "site.archive '{}' must not be inside site.output_dir '{}'",
            archive.display(),
            output_dir.display()
        )));
    }

    let custom_domain = raw
        .site
        .custom_domain
        .unwrap_or_else(|| business.host().to_string());

    let site = SiteSettings {
        output_dir,
        archive,
        keywords: raw.site.keywords,
        custom_domain,
        verification_file: validate_file_name(
            raw.site
                .verification_file
                .as_deref()
                .unwrap_or("google-site-verification.html"),
            "site.verification_file",
        )?,
        verification_token: raw
            .site
            .verification_token
            .unwrap_or_else(|| VERIFICATION_PLACEHOLDER.to_string()),
    };

    if raw.publish.branches.is_empty() {
        return Err(Error::ConfigParse(
            "publish.branches must name at least one branch".to_string(),
        ));
    }
    if raw.publish.branches.iter().any(|b| b.trim().is_empty()) {
        return Err(Error::ConfigParse(
            "publish.branches must not contain blank entries".to_string(),
        ));
    }

    Ok(SiteConfig {
        business,
        site,
        pages: raw.page,
        publish: raw.publish,
    })
}

/// Slugs become URL path segments and file names, so only lowercase ASCII
/// alphanumerics and `-` are accepted. `index` is reserved for the home pages.
fn validate_slug(slug: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(Error::InvalidPage {
            slug: slug.to_string(),
            reason: reason.to_string(),
        })
    };

    if slug.is_empty() {
        return invalid("slug is empty");
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return invalid("slug may only contain a-z, 0-9 and '-'");
    }
    if slug == "index" {
        return invalid("'index' is reserved for the language home pages");
    }
    Ok(())
}

/// Validate an output path from site.toml.
///
/// Rejects absolute paths and parent directory references so a build never
/// writes outside the project directory.
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    if path.components().any(|c| c == Component::ParentDir) {
        return Err(Error::ConfigParse(format!(
            "Parent directory references (..) not allowed in '{}': '{}'",
            field_name, path_str
        )));
    }

    // `./out` and `out` must compare equal
    Ok(path
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect())
}

/// Names the build writes at the output root besides the verification file
const RESERVED_ROOT_NAMES: &[&str] = &[
    "index.html",
    "sitemap.xml",
    "robots.txt",
    "schema_localbusiness.json",
    "CNAME",
    "en",
    "ar",
    ".git",
];

/// Validate a file name written at the root of the output directory.
fn validate_file_name(name: &str, field_name: &str) -> Result<String> {
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || name.contains(['/', '\\']) {
        return Err(Error::ConfigParse(format!(
            "'{}' must be a bare file name, got '{}'",
            field_name, name
        )));
    }

    if RESERVED_ROOT_NAMES.contains(&name) {
        return Err(Error::ConfigParse(format!(
            "'{}' would overwrite the generated '{}'",
            field_name, name
        )));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r##"
[business]
name_en = "Alforsa Ice Cream Machines"
name_ar = "الفرصة لمكائن الآيس كريم"
phone = "+966509995448"
main_url = "https://alforsa.sa/"
description_en = "Supplier of soft serve ice cream machines."
description_ar = "مورد ماكينات الآيس كريم السوفتر."
street_address = "Riyadh, Saudi Arabia"
currency = "SAR"

[[page]]
slug = "slush-machine"
title_en = "Slush Machine"
title_ar = "ماكينة سلاش"
"##;

    #[test]
    fn test_parse_minimal_config_applies_defaults() {
        let config = parse_site_toml_str(MINIMAL).unwrap();
        assert_eq!(config.pages.len(), 1);
        assert_eq!(config.business.currency, "SAR");
        assert_eq!(config.site.output_dir, PathBuf::from("site"));
        assert_eq!(config.site.archive, PathBuf::from("site.zip"));
        assert_eq!(config.site.custom_domain, "alforsa.sa");
        assert_eq!(config.site.verification_token, VERIFICATION_PLACEHOLDER);
        assert_eq!(config.publish.branches, vec!["master", "main"]);
        assert_eq!(config.publish.temp_remote, "temp-origin");
        assert!(config.page("slush-machine").is_some());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = format!(
            r##"{MINIMAL}
[site]
output_dir = "alforsa_site"
archive = "alforsa_site.zip"
keywords = ["Alforsa", "slush"]
custom_domain = "www.alforsa.sa"

[publish]
repository = "alforsa"
branches = ["main"]
"##
        );
        let config = parse_site_toml_str(&toml).unwrap();
        assert_eq!(config.site.output_dir, PathBuf::from("alforsa_site"));
        assert_eq!(config.site.keywords, vec!["Alforsa", "slush"]);
        assert_eq!(config.site.custom_domain, "www.alforsa.sa");
        assert_eq!(config.publish.repository, "alforsa");
        assert_eq!(config.publish.branches, vec!["main"]);
        // Unspecified publish fields keep their defaults
        assert_eq!(config.publish.api_base, "https://api.github.com");
    }

    #[test]
    fn test_rejects_duplicate_slug() {
        let toml = format!(
            r##"{MINIMAL}
[[page]]
slug = "slush-machine"
title_en = "Again"
title_ar = "مرة أخرى"
"##
        );
        let err = parse_site_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("3-burner-slush-machine").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Spare Parts").is_err());
        assert!(validate_slug("../etc").is_err());
        assert!(validate_slug("index").unwrap_err().to_string().contains("reserved"));
    }

    #[test]
    fn test_rejects_non_http_main_url() {
        let toml = MINIMAL.replace("https://alforsa.sa/", "alforsa.sa");
        let err = parse_site_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("main_url"));
    }

    #[test]
    fn test_rejects_unsafe_output_paths() {
        let toml = format!("{MINIMAL}\n[site]\noutput_dir = \"../outside\"\n");
        assert!(
            parse_site_toml_str(&toml)
                .unwrap_err()
                .to_string()
                .contains("Parent directory references")
        );

        let toml = format!("{MINIMAL}\n[site]\noutput_dir = \"/tmp/site\"\n");
        assert!(
            parse_site_toml_str(&toml)
                .unwrap_err()
                .to_string()
                .contains("Absolute paths not allowed")
        );
    }

    #[test]
    fn test_rejects_archive_inside_output() {
        let toml = format!("{MINIMAL}\n[site]\noutput_dir = \"out\"\narchive = \"out/site.zip\"\n");
        let err = parse_site_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("must not be inside"));
    }

    #[test]
    fn test_rejects_archive_inside_output_with_dot_prefix() {
        let toml = format!("{MINIMAL}\n[site]\noutput_dir = \"./out\"\narchive = \"out/site.zip\"\n");
        let err = parse_site_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("must not be inside"));

        let toml = format!("{MINIMAL}\n[site]\noutput_dir = \"out\"\narchive = \"./out/./site.zip\"\n");
        assert!(parse_site_toml_str(&toml).is_err());
    }

    #[test]
    fn test_rejects_project_root_as_output() {
        for dir in [".", "./", "./."] {
            let toml = format!("{MINIMAL}\n[site]\noutput_dir = \"{dir}\"\narchive = \"site.zip\"\n");
            let err = parse_site_toml_str(&toml).unwrap_err();
            assert!(err.to_string().contains("subdirectory"), "{dir}: {err}");
        }
    }

    #[test]
    fn test_dot_prefixed_paths_are_normalized() {
        let toml = format!("{MINIMAL}\n[site]\noutput_dir = \"./out\"\narchive = \"./dist/site.zip\"\n");
        let config = parse_site_toml_str(&toml).unwrap();
        assert_eq!(config.site.output_dir, PathBuf::from("out"));
        assert_eq!(config.site.archive, PathBuf::from("dist/site.zip"));
    }

    #[test]
    fn test_verification_file_must_be_bare_name() {
        for name in ["../escaped.html", "/tmp/escaped.html", "en/verify.html", "sub\\\\verify.html", "."] {
            let toml = format!("{MINIMAL}\n[site]\nverification_file = \"{name}\"\n");
            let err = parse_site_toml_str(&toml).unwrap_err();
            assert!(err.to_string().contains("bare file name"), "{name}: {err}");
        }

        let toml = format!("{MINIMAL}\n[site]\nverification_file = \"google123.html\"\n");
        assert_eq!(parse_site_toml_str(&toml).unwrap().site.verification_file, "google123.html");
    }

    #[test]
    fn test_verification_file_cannot_replace_generated_documents() {
        for name in ["sitemap.xml", "index.html", "robots.txt", "CNAME", "schema_localbusiness.json", "ar"] {
            let toml = format!("{MINIMAL}\n[site]\nverification_file = \"{name}\"\n");
            let err = parse_site_toml_str(&toml).unwrap_err();
            assert!(err.to_string().contains("would overwrite"), "{name}: {err}");
        }
    }

    #[test]
    fn test_rejects_empty_branch_list() {
        let toml = format!("{MINIMAL}\n[publish]\nbranches = []\n");
        assert!(parse_site_toml_str(&toml).is_err());
    }

    #[test]
    fn test_rejects_blank_branch_entry() {
        let toml = format!("{MINIMAL}\n[publish]\nbranches = [\"\", \"main\"]\n");
        let err = parse_site_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("blank entries"));

        let toml = format!("{MINIMAL}\n[publish]\nbranches = [\"master\", \"  \"]\n");
        assert!(parse_site_toml_str(&toml).is_err());
    }

    #[test]
    fn test_missing_business_section() {
        assert!(parse_site_toml_str("[[page]]\nslug = \"x\"\ntitle_en = \"X\"\ntitle_ar = \"Xع\"\n").is_err());
    }
}
