use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Starter page inventory: (slug, English title, Arabic title)
const STARTER_PAGES: &[(&str, &str, &str)] = &[
    (
        "soft-serve-ice-cream-machine",
        "Soft Serve Ice Cream Machine",
        "ماكينة آيس كريم سوفت سيرف",
    ),
    (
        "alforsa-ice-cream-machine",
        "Alforsa Ice Cream Machine",
        "ماكينة آيس كريم الفرصة",
    ),
    ("slush-machine", "Slush Machine", "ماكينة سلاش"),
    (
        "3-burner-slush-machine",
        "3 Burner Slush Machine",
        "ماكينة سلاش بثلاث شعلات",
    ),
    ("spare-parts", "Spare Parts", "قطع غيار"),
    ("maintenance", "Maintenance & Service", "الصيانة والخدمة"),
];

const STARTER_KEYWORDS: &[&str] = &[
    "Alforsa",
    "الفرصة",
    "ice cream machine",
    "soft serve",
    "slush",
    "slush machine",
    "spare parts",
    "maintenance",
    "3 burner slush",
];

/// Escape a string for a TOML basic string.
///
/// The starter file is assembled by hand so it can carry comments, which
/// serializing through the toml crate would drop.
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Create a starter site.toml in an existing directory
pub async fn run(path: PathBuf) -> Result<()> {
    println!("Initializing site project: {}", path.display());

    if !path.exists() {
        anyhow::bail!(
            "Directory '{}' does not exist. Create it first: mkdir {}",
            path.display(),
            path.display()
        );
    }

    let site_toml_path = path.join("site.toml");
    if site_toml_path.exists() {
        anyhow::bail!(
            "site.toml already exists at {}\nHint: Delete it first or use a different directory",
            site_toml_path.display()
        );
    }

    let content = starter_site_toml();
    storefront_kit_core::config::parse_site_toml_str(&content)
        .context("Generated site.toml failed to parse")?;
    fs::write(&site_toml_path, content)?;

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  └── site.toml           ← Business details and page inventory");

    println!("\nNext steps:");
    println!("  1. Edit site.toml (business details, pages, verification token)");
    println!("  2. Preview: storefront-kit preview {}", path.display());
    println!("  3. Publish: storefront-kit publish {}", path.display());

    Ok(())
}

pub(crate) fn starter_site_toml() -> String {
    let keywords = STARTER_KEYWORDS
        .iter()
        .map(|k| format!("\"{}\"", toml_escape_string(k)))
        .collect::<Vec<_>>()
        .join(", ");

    let mut toml = format!(
        r##"# Generated by storefront-kit init
# Edit this file to describe your business and its pages

[business]
name_en = "Alforsa Ice Cream Machines"
name_ar = "الفرصة لمكائن الآيس كريم"
phone = "+966509995448"
main_url = "https://alforsa.sa/"
description_en = "Supplier of soft serve ice cream machines, slush machines, spare parts and maintenance in Saudi Arabia and worldwide."
description_ar = "مورد ماكينات الآيس كريم السوفتر، ماكينات سلاش، قطع غيار وصيانة في السعودية وحول العالم."
street_address = "Riyadh, Saudi Arabia"
currency = "SAR"

[site]
output_dir = "alforsa_site"
archive = "alforsa_site.zip"
keywords = [{keywords}]
custom_domain = "alforsa.sa"
verification_file = "google-site-verification-alforsa.html"
verification_token = "replace_with_token"  # TODO: Paste the Search Console token

[publish]
repository = "alforsa"
commit_message = "Initial commit - Alforsa site"
# branches = ["master", "main"]
# pages_branch = "master"

"##
    );

    for (slug, title_en, title_ar) in STARTER_PAGES {
        toml.push_str("[[page]]\n");
        toml.push_str(&format!("slug = \"{}\"\n", slug));
        toml.push_str(&format!("title_en = \"{}\"\n", toml_escape_string(title_en)));
        toml.push_str(&format!("title_ar = \"{}\"\n", toml_escape_string(title_ar)));
        toml.push_str("# body_en = \"Markdown shown under the heading\"  # Optional\n");
        toml.push('\n');
    }

    toml
}
