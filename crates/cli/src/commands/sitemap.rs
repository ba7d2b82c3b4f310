use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use storefront_kit_generator::alternates::{AlternateSitemap, DEFAULT_PATHS};

/// Write a standalone sitemap with en/ar alternates.
///
/// An empty `paths` list falls back to the built-in path list; `base` is
/// used either way.
pub async fn run(paths: Vec<String>, base: String, output: PathBuf) -> Result<()> {
    let sitemap = if paths.is_empty() {
        AlternateSitemap::new(&base, DEFAULT_PATHS.iter().copied())
    } else {
        AlternateSitemap::new(&base, paths)
    };

    write_sitemap(&sitemap, &output)?;
    println!("✓ Sitemap written to {} ({} URLs)", output.display(), sitemap.len());
    Ok(())
}

fn write_sitemap(sitemap: &AlternateSitemap, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(output, sitemap.to_xml(Utc::now()))
        .with_context(|| format!("Failed to write {}", output.display()))
}
