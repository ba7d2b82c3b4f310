use anyhow::Result;
use std::path::{Path, PathBuf};
use storefront_kit_core::SiteConfig;
use storefront_kit_generator::{RenderOptions, create_archive, render_site};
use storefront_kit_validator::validate_config;

use super::load_project;

/// Where a build landed
pub struct BuildOutput {
    pub output_dir: PathBuf,
    pub archive: PathBuf,
    pub documents: usize,
    pub archived: usize,
}

/// Build static site for deployment
pub async fn run(path: PathBuf) -> Result<()> {
    let config = load_project(&path)?;
    let built = build_site(&path, &config)?;

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", built.output_dir.display());
    println!("   Archive: {}", built.archive.display());
    println!();
    println!("To test locally:");
    println!("   storefront-kit preview {}", path.display());
    println!();

    Ok(())
}

/// Render, write and archive the site described by `config`.
///
/// Any filesystem failure aborts the build; there is no partial-site recovery.
pub fn build_site(path: &Path, config: &SiteConfig) -> Result<BuildOutput> {
    let output_dir = path.join(&config.site.output_dir);
    let archive = path.join(&config.site.archive);

    println!("🔨 Building static site...");
    println!("   Business: {}", config.business.name_en);
    println!("   Pages: {}", config.pages.len());
    println!("   Output: {}", output_dir.display());

    let report = validate_config(config);
    for warning in &report.warnings {
        eprintln!("   ⚠ Warning: {}", warning);
    }
    println!();

    println!("📄 Rendering documents...");
    let tree = render_site(config, &RenderOptions::for_today());
    let documents = tree.write_to(&output_dir)?;
    println!("   ✓ Wrote {} documents", documents);

    println!("📦 Packaging archive...");
    let archived = create_archive(&output_dir, &archive)?;
    println!("   ✓ Archived {} files to {}", archived, archive.display());

    Ok(BuildOutput {
        output_dir,
        archive,
        documents,
        archived,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_site_writes_tree_and_archive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("site.toml"), super::super::init::starter_site_toml()).unwrap();
        let config = load_project(dir.path()).unwrap();

        let built = build_site(dir.path(), &config).unwrap();
        assert_eq!(built.documents, 2 * config.pages.len() + 8);
        assert_eq!(built.archived, built.documents);
        assert!(built.output_dir.join("en/slush-machine.html").is_file());
        assert!(built.output_dir.join("CNAME").is_file());
        assert!(built.archive.is_file());
        assert!(!built.archive.starts_with(&built.output_dir));
    }

    #[test]
    fn test_build_requires_site_toml() {
        let dir = TempDir::new().unwrap();
        let err = load_project(dir.path()).err().unwrap().to_string();
        assert!(err.contains("site.toml not found"));
    }
}
