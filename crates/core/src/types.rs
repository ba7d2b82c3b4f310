use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete site configuration loaded from site.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub business: BusinessProfile,
    pub site: SiteSettings,
    pub pages: Vec<PageSpec>,
    pub publish: PublishSettings,
}

impl SiteConfig {
    /// Look up a page by slug
    pub fn page(&self, slug: &str) -> Option<&PageSpec> {
        self.pages.iter().find(|p| p.slug == slug)
    }
}

/// The business the site is about. Read-only for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub name_en: String,
    pub name_ar: String,
    pub phone: String,
    pub main_url: String,
    pub description_en: String,
    pub description_ar: String,
    pub street_address: String,
    pub currency: String,
}

impl BusinessProfile {
    /// Main URL without trailing slashes, used as the prefix for every absolute link
    pub fn base_url(&self) -> &str {
        self.main_url.trim_end_matches('/')
    }

    /// Absolute URL for a site-relative path (`en/x.html` -> `https://host/en/x.html`)
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    pub fn name(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.name_en,
            Language::Ar => &self.name_ar,
        }
    }

    pub fn description(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.description_en,
            Language::Ar => &self.description_ar,
        }
    }

    /// Host component of the main URL (`https://alforsa.sa/` -> `alforsa.sa`)
    pub fn host(&self) -> &str {
        let without_scheme = self
            .main_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.main_url);
        without_scheme
            .split(['/', '?', '#'])
            .next()
            .unwrap_or(without_scheme)
    }
}

/// One entry of the page inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpec {
    pub slug: String,
    pub title_en: String,
    pub title_ar: String,
    /// Optional Markdown body replacing the default English body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_en: Option<String>,
    /// Optional Markdown body replacing the default Arabic body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_ar: Option<String>,
}

impl PageSpec {
    pub fn title(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.title_en,
            Language::Ar => &self.title_ar,
        }
    }

    pub fn body(&self, lang: Language) -> Option<&str> {
        match lang {
            Language::En => self.body_en.as_deref(),
            Language::Ar => self.body_ar.as_deref(),
        }
    }

    /// Site-relative path of this page in the given language
    pub fn path(&self, lang: Language) -> String {
        format!("{}/{}.html", lang.code(), self.slug)
    }
}

/// Supported site languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ar];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    /// Text direction for the `dir` attribute
    pub fn dir(self) -> &'static str {
        match self {
            Language::En => "ltr",
            Language::Ar => "rtl",
        }
    }

    pub fn other(self) -> Language {
        match self {
            Language::En => Language::Ar,
            Language::Ar => Language::En,
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        match code {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }

    /// Site-relative path of the language home page
    pub fn home_path(self) -> String {
        format!("{}/index.html", self.code())
    }
}

/// Output layout and SEO settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Output directory, relative to the project directory
    pub output_dir: PathBuf,
    /// Zip archive path, relative to the project directory
    pub archive: PathBuf,
    pub keywords: Vec<String>,
    /// Hostname written to the CNAME marker
    pub custom_domain: String,
    pub verification_file: String,
    /// Placeholder until the search console issues a real token
    pub verification_token: String,
}

/// Repository hosting settings used by `publish`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishSettings {
    pub repository: String,
    pub commit_message: String,
    /// Branch names tried in order when pushing
    pub branches: Vec<String>,
    pub pages_branch: String,
    pub pages_path: String,
    pub temp_remote: String,
    pub api_base: String,
    pub git_host: String,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            repository: "site".to_string(),
            commit_message: "Initial commit - site".to_string(),
            branches: vec!["master".to_string(), "main".to_string()],
            pages_branch: "master".to_string(),
            pages_path: "/".to_string(),
            temp_remote: "temp-origin".to_string(),
            api_base: "https://api.github.com".to_string(),
            git_host: "github.com".to_string(),
        }
    }
}

/// Placeholder written into the verification stub until replaced
pub const VERIFICATION_PLACEHOLDER: &str = "replace_with_token";
