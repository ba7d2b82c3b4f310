use crate::RenderOptions;
use chrono::Datelike;
use pulldown_cmark::{Options, Parser, html::push_html};
use storefront_kit_core::{Language, PageSpec, SiteConfig};

/// HTML-escape a string before placing it in text or attribute position
///
/// Escapes: & < > " '
pub(crate) fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) struct RenderContext<'a> {
    pub config: &'a SiteConfig,
    pub options: &'a RenderOptions,
}

/// Head metadata for one document. Values are unescaped.
struct Head<'a> {
    lang: Language,
    title: String,
    description: &'a str,
    canonical: String,
    /// (absolute href, hreflang)
    alternates: Vec<(String, &'static str)>,
}

/// Alternate links for a document that exists in both languages
fn language_alternates(ctx: &RenderContext, path_for: impl Fn(Language) -> String) -> Vec<(String, &'static str)> {
    let business = &ctx.config.business;
    let mut links: Vec<(String, &'static str)> = Language::ALL
        .iter()
        .map(|&lang| (business.absolute_url(&path_for(lang)), lang.code()))
        .collect();
    links.push((business.absolute_url(&path_for(Language::En)), "x-default"));
    links
}

/// Convert a Markdown page body to HTML
fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut out = String::new();
    push_html(&mut out, parser);
    out
}

/// Per-language document for one entry of the page inventory
pub(crate) fn product_page(ctx: &RenderContext, page: &PageSpec, lang: Language) -> String {
    let business = &ctx.config.business;
    let title = page.title(lang);
    let description = business.description(lang);

    let body = match page.body(lang) {
        Some(markdown) => format!(
            "<h2>{}</h2>\n{}",
            html_escape(title),
            markdown_to_html(markdown)
        ),
        None => format!(
            "<h2>{title}</h2>\n<p>{title} — {description}</p>",
            title = html_escape(title),
            description = html_escape(description),
        ),
    };

    let meta_description = format!("{} — {}", title, description);
    let head = Head {
        lang,
        title: format!("{} — {}", title, business.name_en),
        description: &meta_description,
        canonical: business.absolute_url(&page.path(lang)),
        alternates: language_alternates(ctx, |l| page.path(l)),
    };

    layout(ctx, &head, &body)
}

/// Language home page listing every page in inventory order
pub(crate) fn home_page(ctx: &RenderContext, lang: Language) -> String {
    let config = ctx.config;
    let business = &config.business;

    let (heading, contact) = match lang {
        Language::En => ("Products &amp; Services", "Contact us"),
        Language::Ar => ("المنتجات والخدمات", "اتصل بنا"),
    };

    // Links are relative so the site also works under a project sub-path
    let items: String = config
        .pages
        .iter()
        .map(|page| {
            format!(
                "<li><a href=\"{}.html\">{} — {}</a></li>\n",
                page.slug,
                html_escape(page.title(lang)),
                html_escape(page.title(lang.other()))
            )
        })
        .collect();

    let phone = html_escape(&business.phone);
    let body = format!(
        "<h2>{heading}</h2>\n<ul>\n{items}</ul>\n<p>{contact}: <a href=\"tel:{phone}\">{phone}</a></p>"
    );

    let home = match lang {
        Language::En => "Home",
        Language::Ar => "الصفحة الرئيسية",
    };
    let title = format!("{} — {}", business.name(lang), home);

    let head = Head {
        lang,
        title,
        description: business.description(lang),
        canonical: business.absolute_url(&lang.home_path()),
        alternates: language_alternates(ctx, |l| l.home_path()),
    };

    layout(ctx, &head, &body)
}

/// Root landing page: language selector plus a link to the main site
pub(crate) fn landing_page(ctx: &RenderContext) -> String {
    let business = &ctx.config.business;
    let main_url = html_escape(&business.main_url);

    let body = format!(
        r#"<h2>Welcome / مرحباً</h2>
<p><a href="en/index.html">English site — English</a></p>
<p><a href="ar/index.html">الموقع باللغة العربية — Arabic</a></p>
<p>Or visit the official site: <a href="{main_url}">{main_url}</a></p>"#
    );

    let mut alternates: Vec<(String, &'static str)> = Language::ALL
        .iter()
        .map(|&lang| (business.absolute_url(&lang.home_path()), lang.code()))
        .collect();
    alternates.push((business.absolute_url(""), "x-default"));

    let head = Head {
        lang: Language::En,
        title: format!("{} — Landing", business.name_en),
        description: &business.description_en,
        canonical: business.absolute_url(""),
        alternates,
    };

    layout(ctx, &head, &body)
}

const STYLE: &str = "body{font-family:Arial,Helvetica,sans-serif;max-width:960px;margin:20px auto;padding:0 16px;line-height:1.5} header h1{font-size:1.6rem} footer{margin-top:40px;color:#444}";

const RELOAD_SCRIPT: &str = r#"<script>
    // Hot reload via Server-Sent Events
    const eventSource = new EventSource('/_reload');
    eventSource.onmessage = () => location.reload();
    eventSource.onerror = () => eventSource.close();
</script>"#;

/// Shared document shell: head metadata, header and footer blocks
fn layout(ctx: &RenderContext, head: &Head, body: &str) -> String {
    let config = ctx.config;
    let business = &config.business;

    let title = html_escape(&head.title);
    let description = html_escape(head.description);
    let canonical = html_escape(&head.canonical);
    let keywords = html_escape(&config.site.keywords.join(", "));
    let site_name = html_escape(&business.name_en);
    let name_en = html_escape(&business.name_en);
    let name_ar = html_escape(&business.name_ar);
    let header_description = html_escape(business.description(head.lang));
    let phone = html_escape(&business.phone);
    let main_url = html_escape(&business.main_url);
    let address = html_escape(&business.street_address);
    let year = ctx.options.today.year();

    let alternates: String = head
        .alternates
        .iter()
        .map(|(href, hreflang)| {
            format!(
                "\n  <link rel=\"alternate\" href=\"{}\" hreflang=\"{}\">",
                html_escape(href),
                hreflang
            )
        })
        .collect();

    let reload = if ctx.options.live_reload {
        RELOAD_SCRIPT
    } else {
        ""
    };

    format!(
        r#"<!doctype html>
<html lang="{lang}" dir="{dir}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width,initial-scale=1">
  <title>{title}</title>
  <meta name="description" content="{description}">
  <meta name="keywords" content="{keywords}">
  <link rel="canonical" href="{canonical}">{alternates}
  <meta property="og:site_name" content="{site_name}">
  <meta property="og:title" content="{title}">
  <meta property="og:description" content="{description}">
  <meta property="og:url" content="{canonical}">
  <meta property="og:locale" content="{lang}">
  <meta name="twitter:card" content="summary_large_image">
  <meta name="twitter:title" content="{title}">
  <meta name="twitter:description" content="{description}">
  <style>{style}</style>
</head>
<body>
<header>
  <h1>{name_en} — {name_ar}</h1>
  <p>{header_description}</p>
  <p><strong>Phone:</strong> <a href="tel:{phone}">{phone}</a> | <strong>Website:</strong> <a href="{main_url}">{main_url}</a></p>
  <hr>
</header>
<main>
{body}
</main>
<footer>
  <p>{name_en} — {name_ar}</p>
  <p>Address: {address}</p>
  <p>Phone: <a href="tel:{phone}">{phone}</a> | Website: <a href="{main_url}">{main_url}</a></p>
  <small>© {year} {name_en}</small>
</footer>
{reload}</body>
</html>
"#,
        lang = head.lang.code(),
        dir = head.lang.dir(),
        style = STYLE,
    )
}
