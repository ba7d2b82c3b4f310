use anyhow::{Context, Result};
use dialoguer::Password;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use storefront_kit_core::SiteConfig;
use storefront_kit_deployer::publisher::pages_url;
use storefront_kit_deployer::{
    CommitIdentity, Credentials, GitCli, GitHubClient, PUSH_FAILURE_HINT, PagesOutcome,
    PushOutcome, Publisher, RepoOutcome,
};

use super::build::build_site;
use super::load_project;

/// Whether the publish steps ran
#[derive(Debug, PartialEq, Eq)]
enum PublishStatus {
    /// Username or token was blank; nothing left the machine
    Skipped,
    Attempted,
}

/// Helper to read user input
fn read_input(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Build the site, then create the repository, push and enable Pages.
///
/// Publishing steps only warn on failure; the local build stays usable
/// either way.
pub async fn run(path: PathBuf) -> Result<()> {
    let config = load_project(&path)?;
    println!("=== {} site builder & GitHub publisher ===", config.business.name_en);

    let built = build_site(&path, &config)?;
    println!(
        "✅ Built site in '{}', and packaged as {}",
        built.output_dir.display(),
        built.archive.display()
    );
    println!();

    let username = read_input("Enter your GitHub username: ")?;
    let token = Password::new()
        .with_prompt("Enter your GitHub personal access token (input hidden)")
        .allow_empty_password(true)
        .interact()
        .context("Failed to read token")?;

    if publish_with_input(&config, &built.output_dir, &username, &token).await?
        == PublishStatus::Attempted
    {
        println!("\nDone.");
    }

    Ok(())
}

/// Run the three publish steps for the prompted username and token.
///
/// Blank input skips publishing before any client is built.
async fn publish_with_input(
    config: &SiteConfig,
    output_dir: &Path,
    username: &str,
    token: &str,
) -> Result<PublishStatus> {
    let Some(credentials) = Credentials::from_input(username, token) else {
        println!("Username and token are required to push to GitHub. Skipping publish.");
        println!("Local site is in: {}", output_dir.display());
        return Ok(PublishStatus::Skipped);
    };

    let settings = &config.publish;
    let api = GitHubClient::new(&settings.api_base, credentials.clone())?;
    let git = GitCli::new(output_dir)
        .with_fallback_identity(CommitIdentity::noreply(credentials.username()));
    let publisher = Publisher::new(&api, &git, settings, &credentials);

    println!("\nCreating GitHub repo (if not exists) ...");
    match publisher.create_repository().await {
        Ok(RepoOutcome::Created) => println!("✅ GitHub repository created."),
        Ok(RepoOutcome::AlreadyExists) => println!(
            "⚠️ Repo may already exist (HTTP 422). Will continue and try to push to it."
        ),
        Ok(RepoOutcome::Unexpected { status, body }) => {
            println!("❌ Failed to create repo via API. Response: {} {}", status, body)
        }
        Err(e) => println!("❌ Failed to create repo via API: {}", credentials.redact(&e.to_string())),
    }

    println!("Pushing site to GitHub (token used only for this push) ...");
    match publisher.push_site() {
        Ok(report) => {
            if let Some(warning) = &report.commit_warning {
                println!("⚠️ Commit warning: {}", warning);
            }
            match report.outcome {
                PushOutcome::Pushed { branch } => println!(
                    "🚀 Files pushed to GitHub repository '{}/{}' (branch: {}).",
                    credentials.username(),
                    settings.repository,
                    branch
                ),
                PushOutcome::Failed { attempts } => {
                    for attempt in &attempts {
                        println!("❌ Push to '{}' failed: {}", attempt.branch, attempt.error);
                    }
                    println!("{}", PUSH_FAILURE_HINT);
                }
            }
            if let Some(warning) = &report.cleanup_warning {
                println!(
                    "⚠️ Could not remove the temporary remote '{}': {}",
                    settings.temp_remote, warning
                );
                println!(
                    "   Remove it by hand: git -C {} remote remove {}",
                    output_dir.display(),
                    settings.temp_remote
                );
            }
        }
        Err(e) => println!("❌ Git error: {}", e),
    }

    match publisher.enable_pages().await {
        Ok(PagesOutcome::Enabled) => println!("🌐 GitHub Pages enabled via API."),
        Ok(PagesOutcome::Unexpected { status, body }) => {
            println!("⚠️ GitHub Pages API response: {} {}", status, body)
        }
        Err(e) => println!(
            "⚠️ GitHub Pages API request failed: {}",
            credentials.redact(&e.to_string())
        ),
    }
    println!("Your GitHub Pages URL (expected): {}", publisher.pages_url());

    print!("{}", next_steps_guide(config, credentials.username()));

    Ok(PublishStatus::Attempted)
}

/// Manual follow-up steps printed after publishing
fn next_steps_guide(config: &SiteConfig, username: &str) -> String {
    format!(
        r#"
==== NEXT STEPS ====

1) Visit your GitHub Pages URL (it may take a minute to build):
   {url}

2) Google Search Console verification (two common options):
   A) HTML file method:
      - Go to https://search.google.com/search-console/
      - Add property: '{url}' (URL prefix)
      - Choose 'HTML file' verification and upload '{verification_file}' from the root of the site ({output_dir}).
   B) Or choose 'Domain' and add the DNS TXT record at your domain provider (if you own {domain}).

3) Google Business Profile:
   - Go to https://business.google.com/ and sign in with a Google account.
   - Create a new business with the name EXACTLY: '{name}'
   - Fill in address ({address}) and phone: {phone}
   - Add website: your GitHub Pages URL or your custom domain.
   - Request verification (phone/postcard) and complete it.

4) To serve the site from {domain}:
   - In your domain DNS settings, create a CNAME record:
       Host/Name: www
       Value/Target: {username}.github.io.
   - For the apex domain, add the A records listed at https://docs.github.com/en/pages/configuring-a-custom-domain-for-your-github-pages-site
   - Then in the repository Settings → Pages, set the custom domain to '{domain}' and enable HTTPS.

5) Submit the sitemap in Search Console:
   - {url}sitemap.xml

6) Revoke the GitHub token if you no longer need it:
   - https://github.com/settings/tokens

7) Link your social profiles (Facebook, Instagram, YouTube, LinkedIn) to the site.

8) Add detail to product pages: photos, specs, manuals, pricing and FAQs.

9) Keep every page's English and Arabic versions linked through hreflang alternates.

If the push failed, create the repository manually and push the '{output_dir}' folder with git.
"#,
        url = pages_url(username, &config.publish.repository),
        domain = config.site.custom_domain,
        verification_file = config.site.verification_file,
        output_dir = config.site.output_dir.display(),
        name = config.business.name_en,
        address = config.business.street_address,
        phone = config.business.phone,
    )
}
