use std::path::PathBuf;
use storefront_kit_validator::validate_site;

use super::load_project;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let config = load_project(&path)?;
    println!("✓ site.toml valid");
    println!("  Business: {}", config.business.name_en);
    println!("  Pages: {}", config.pages.len());

    let report = validate_site(&path, &config)?;

    for line in &report.info {
        println!("  {}", line);
    }
    for warning in &report.warnings {
        println!("⚠ {}", warning);
    }
    for error in &report.errors {
        println!("✗ {}", error);
    }

    if !report.is_ok() {
        anyhow::bail!("Validation failed with {} error(s)", report.errors.len());
    }

    println!("\n✓ Validation passed");
    Ok(())
}
