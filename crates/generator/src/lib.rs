// Static site generation: bilingual pages, SEO files, archive, alternate-language sitemap

pub mod alternates;
pub mod archive;
mod html;
mod seo;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use storefront_kit_core::{Language, SiteConfig};

pub use archive::create_archive;

/// One rendered file, addressed by its path relative to the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub path: String,
    pub content: Vec<u8>,
}

impl GeneratedDocument {
    fn text(path: impl Into<String>, content: String) -> Self {
        Self {
            path: path.into(),
            content: content.into_bytes(),
        }
    }

    /// Content as UTF-8, when it is text
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

/// Every document of one build, in generation order
#[derive(Debug, Clone, Default)]
pub struct SiteTree {
    documents: Vec<GeneratedDocument>,
}

impl SiteTree {
    pub fn documents(&self) -> &[GeneratedDocument] {
        &self.documents
    }

    pub fn get(&self, path: &str) -> Option<&GeneratedDocument> {
        self.documents.iter().find(|d| d.path == path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn push(&mut self, document: GeneratedDocument) {
        self.documents.push(document);
    }

    /// Write every document under `root`, creating directories as needed and
    /// overwriting existing files. Returns the number of files written.
    pub fn write_to(&self, root: &Path) -> Result<usize> {
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create output directory {}", root.display()))?;

        for document in &self.documents {
            let target = root.join(&document.path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&target, &document.content)
                .with_context(|| format!("Failed to write {}", target.display()))?;
        }

        Ok(self.documents.len())
    }
}

/// Knobs that vary between runs of the same configuration
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Stamped into sitemap `lastmod` and the footer copyright year
    pub today: NaiveDate,
    /// Inject the preview server's reload script into HTML documents
    pub live_reload: bool,
}

impl RenderOptions {
    pub fn for_today() -> Self {
        Self {
            today: chrono::Utc::now().date_naive(),
            live_reload: false,
        }
    }
}

/// Render the complete site for `config`. Pure: no filesystem access.
///
/// Output, in order: one document per page per language, the two language
/// home pages, the root landing page, sitemap.xml, robots.txt, the JSON-LD
/// LocalBusiness snippet, the search-console verification stub and CNAME.
pub fn render_site(config: &SiteConfig, options: &RenderOptions) -> SiteTree {
    let ctx = html::RenderContext { config, options };
    let mut tree = SiteTree::default();

    for page in &config.pages {
        for lang in Language::ALL {
            tree.push(GeneratedDocument::text(
                page.path(lang),
                html::product_page(&ctx, page, lang),
            ));
        }
    }

    for lang in Language::ALL {
        tree.push(GeneratedDocument::text(
            lang.home_path(),
            html::home_page(&ctx, lang),
        ));
    }

    tree.push(GeneratedDocument::text("index.html", html::landing_page(&ctx)));
    tree.push(GeneratedDocument::text(
        "sitemap.xml",
        seo::sitemap(config, options.today),
    ));
    tree.push(GeneratedDocument::text("robots.txt", seo::robots(config)));
    tree.push(GeneratedDocument::text(
        "schema_localbusiness.json",
        seo::local_business_json_ld(&config.business),
    ));
    tree.push(GeneratedDocument::text(
        config.site.verification_file.clone(),
        seo::verification_stub(config),
    ));
    tree.push(GeneratedDocument::text("CNAME", seo::cname(config)));

    tree
}
