mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "storefront-kit")]
#[command(version, about = "Bilingual static site builder and GitHub Pages publisher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Create a starter site.toml in a project directory
    Init {
        /// Path to project directory
        path: PathBuf,
    },

    /// Check site.toml and, if built, the generated output
    Validate {
        /// Path to project directory
        path: PathBuf,
    },

    /// Generate the site and zip archive without publishing
    Build {
        /// Path to project directory
        path: PathBuf,
    },

    /// Preview site locally with hot reload
    Preview {
        /// Path to project directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Build, then push to a GitHub repository and enable Pages
    ///
    /// Prompts for a GitHub username and a personal access token with the
    /// 'repo' scope. The token is used for this run only.
    Publish {
        /// Path to project directory
        path: PathBuf,
    },

    /// Write a standalone sitemap with en/ar alternate links
    Sitemap {
        /// Site paths to list (defaults to the built-in list)
        paths: Vec<String>,

        /// Base URL prefixed to every path
        #[arg(short, long, default_value = storefront_kit_generator::alternates::DEFAULT_BASE)]
        base: String,

        /// Output file
        #[arg(short, long, default_value = "public/sitemap.xml")]
        output: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Init { path } => commands::init::run(path).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Build { path } => commands::build::run(path).await,
        Command::Preview { path, port } => commands::preview::run(path, port).await,
        Command::Publish { path } => commands::publish::run(path).await,
        Command::Sitemap {
            paths,
            base,
            output,
        } => commands::sitemap::run(paths, base, output).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "storefront-kit", &mut io::stdout());
            Ok(())
        }
    }
}
