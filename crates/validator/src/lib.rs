// Validation logic: configuration lint and generated-tree verification

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;
use storefront_kit_core::{SiteConfig, VERIFICATION_PLACEHOLDER};
use storefront_kit_generator::{RenderOptions, render_site};
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.info.extend(other.info);
    }
}

/// Lint a parsed configuration. Parse-time rules (slugs, paths) have already
/// been enforced, so findings here are advisory.
pub fn validate_config(config: &SiteConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    let business = &config.business;
    let site = &config.site;

    if site.verification_token == VERIFICATION_PLACEHOLDER {
        report.warnings.push(format!(
            "{} still carries the placeholder token; replace it with the one issued by Search Console",
            site.verification_file
        ));
    }

    if !business.main_url.starts_with("https://") {
        report
            .warnings
            .push(format!("main_url '{}' is not HTTPS", business.main_url));
    }

    if !is_international_phone(&business.phone) {
        report.warnings.push(format!(
            "phone '{}' is not in international +<digits> form; tel: links may not dial",
            business.phone
        ));
    }

    if site.keywords.is_empty() {
        report.warnings.push("keyword list is empty".to_string());
    }

    if site.custom_domain.trim() != business.host() {
        report.warnings.push(format!(
            "custom_domain '{}' differs from the main_url host '{}'",
            site.custom_domain.trim(),
            business.host()
        ));
    }

    for page in &config.pages {
        if page.title_en.trim().is_empty() || page.title_ar.trim().is_empty() {
            report
                .errors
                .push(format!("page '{}' is missing a title", page.slug));
        }
    }

    report.info.push(format!("{} page(s) in inventory", config.pages.len()));
    report.info.push(format!(
        "{} document(s) per build",
        render_site(config, &RenderOptions::for_today()).len()
    ));

    report
}

fn is_international_phone(phone: &str) -> bool {
    phone
        .strip_prefix('+')
        .is_some_and(|digits| (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()))
}

/// Compare a generated output directory against what a build would produce.
///
/// Missing documents are errors. Extra files are reported as info; they are
/// left behind by earlier builds since output is never cleaned.
pub fn validate_tree(root: &Path, config: &SiteConfig) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();

    let expected: BTreeSet<String> = render_site(config, &RenderOptions::for_today())
        .paths()
        .map(str::to_string)
        .collect();

    let mut present = BTreeSet::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != ".git")
    {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .context("Failed to get relative path")?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        present.insert(name);
    }

    for missing in expected.difference(&present) {
        report.errors.push(format!("missing {}", missing));
    }
    for extra in present.difference(&expected) {
        report.info.push(format!("extra file {}", extra));
    }
    report.info.push(format!(
        "{} of {} expected document(s) present",
        expected.intersection(&present).count(),
        expected.len()
    ));

    Ok(report)
}

/// Configuration lint, plus tree verification when the output directory exists
pub fn validate_site(project: &Path, config: &SiteConfig) -> Result<ValidationReport> {
    let mut report = validate_config(config);
    let output = project.join(&config.site.output_dir);
    if output.is_dir() {
        report.merge(validate_tree(&output, config)?);
    } else {
        report
            .info
            .push(format!("{} not built yet", output.display()));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use storefront_kit_core::config::parse_site_toml_str;
    use tempfile::TempDir;

    fn config(extra: &str) -> SiteConfig {
        let toml = format!(
            r##"
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
slug = "spare-parts"
title_en = "Spare Parts"
title_ar = "قطع غيار"
{extra}
"##
        );
        parse_site_toml_str(&toml).unwrap()
    }

    #[test]
    fn test_placeholder_token_and_empty_keywords_warn() {
        let report = validate_config(&config(""));
        assert!(report.is_ok());
        assert!(report.warnings.iter().any(|w| w.contains("placeholder token")));
        assert!(report.warnings.iter().any(|w| w.contains("keyword list is empty")));
        assert!(report.info.iter().any(|i| i == "1 page(s) in inventory"));
        assert!(report.info.iter().any(|i| i == "10 document(s) per build"));
    }

    #[test]
    fn test_clean_config_has_no_warnings() {
        let report = validate_config(&config(
            "\n[site]\nkeywords = [\"Alforsa\"]\nverification_token = \"abc123\"\n",
        ));
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_phone_and_domain_warnings() {
        let mut cfg = config("\n[site]\ncustom_domain = \"www.alforsa.sa\"\n");
        cfg.business.phone = "0509995448".to_string();
        cfg.business.main_url = "http://alforsa.sa/".to_string();
        let report = validate_config(&cfg);
        assert!(report.warnings.iter().any(|w| w.contains("international")));
        assert!(report.warnings.iter().any(|w| w.contains("not HTTPS")));
        assert!(report.warnings.iter().any(|w| w.contains("differs from the main_url host")));
    }

    #[test]
    fn test_blank_title_is_an_error() {
        let mut cfg = config("");
        cfg.pages[0].title_ar = "  ".to_string();
        let report = validate_config(&cfg);
        assert!(!report.is_ok());
        assert!(report.errors[0].contains("spare-parts"));
    }

    #[test]
    fn test_is_international_phone() {
        assert!(is_international_phone("+966509995448"));
        assert!(!is_international_phone("966509995448"));
        assert!(!is_international_phone("+9665 0999"));
        assert!(!is_international_phone("+12"));
    }

    #[test]
    fn test_validate_tree_reports_missing_and_extra() {
        let cfg = config("");
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("site");
        render_site(&cfg, &RenderOptions::for_today())
            .write_to(&root)
            .unwrap();

        let report = validate_tree(&root, &cfg).unwrap();
        assert!(report.is_ok(), "{:?}", report.errors);

        fs::remove_file(root.join("ar/spare-parts.html")).unwrap();
        fs::write(root.join("en/old-page.html"), "stale").unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".git/HEAD"), "ref: refs/heads/master").unwrap();

        let report = validate_tree(&root, &cfg).unwrap();
        assert_eq!(report.errors, vec!["missing ar/spare-parts.html".to_string()]);
        assert!(report.info.contains(&"extra file en/old-page.html".to_string()));
        assert!(!report.info.iter().any(|i| i.contains(".git")));
    }

    #[test]
    fn test_validate_site_before_build() {
        let cfg = config("");
        let dir = TempDir::new().unwrap();
        let report = validate_site(dir.path(), &cfg).unwrap();
        assert!(report.info.iter().any(|i| i.contains("not built yet")));
    }
}
