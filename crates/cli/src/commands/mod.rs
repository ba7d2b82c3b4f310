pub mod build;
pub mod init;
pub mod preview;
pub mod publish;
pub mod sitemap;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;
use storefront_kit_core::{SiteConfig, parse_site_toml};

/// Load site.toml from a project directory
pub fn load_project(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        anyhow::bail!("Project directory does not exist: {}", path.display());
    }

    let site_toml_path = path.join("site.toml");
    if !site_toml_path.exists() {
        anyhow::bail!(
            "site.toml not found in {}\nRun 'storefront-kit init {}' first",
            path.display(),
            path.display()
        );
    }

    parse_site_toml(&site_toml_path).context("Failed to parse site.toml")
}
