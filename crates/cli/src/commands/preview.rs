use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use storefront_kit_generator::{RenderOptions, render_site};
use tempfile::TempDir;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use super::load_project;

#[derive(Clone)]
struct AppState {
    reload_tx: broadcast::Sender<()>,
}

/// Start preview server with hot reload for local development.
///
/// The site is rendered into a temporary directory with the reload script
/// injected, so the configured output directory is never touched. Editing
/// site.toml re-renders and reloads open pages.
pub async fn run(path: PathBuf, port: u16) -> Result<()> {
    println!("🌐 Starting preview server...");
    println!("   Project: {}", path.display());

    let config = load_project(&path)?;
    println!("   ✓ Loaded: {}", config.business.name_en);
    println!("   ✓ Pages: {}", config.pages.len());

    let staging = TempDir::new().context("Failed to create preview directory")?;
    let site_root = staging.path().join("site");
    let documents = render_preview(&path, &site_root)?;
    println!("   ✓ Rendered {} documents", documents);

    // Create broadcast channel for reload events
    let (reload_tx, _) = broadcast::channel::<()>(100);

    let state = AppState {
        reload_tx: reload_tx.clone(),
    };

    let app = Router::new()
        .route("/_reload", get(sse_handler))
        .fallback_service(ServeDir::new(&site_root))
        .with_state(state);

    let watcher_project = path.clone();
    let watcher_root = site_root.clone();
    let watcher_tx = reload_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = watch_config(watcher_project, watcher_root, watcher_tx).await {
            eprintln!("File watcher error: {}", e);
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Preview ready at: http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    drop(staging);
    Ok(())
}

/// Render the project into `site_root`, replacing whatever was there
fn render_preview(project: &Path, site_root: &Path) -> Result<usize> {
    let config = load_project(project)?;
    let options = RenderOptions {
        live_reload: true,
        ..RenderOptions::for_today()
    };
    let tree = render_site(&config, &options);

    if site_root.exists() {
        fs::remove_dir_all(site_root)
            .with_context(|| format!("Failed to clear {}", site_root.display()))?;
    }
    tree.write_to(site_root)
}

/// Re-render on site.toml changes and trigger reload
async fn watch_config(
    project: PathBuf,
    site_root: PathBuf,
    reload_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    // Editors often replace the file, so watch the directory
    watcher.watch(&project, RecursiveMode::NonRecursive)?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) => {
                if !event.paths.iter().any(|p| is_site_toml(p)) {
                    continue;
                }
                println!("   📝 site.toml changed, rebuilding...");
                match render_preview(&project, &site_root) {
                    Ok(documents) => {
                        println!("   ✓ Rendered {} documents", documents);
                        let _ = reload_tx.send(());
                    }
                    Err(e) => eprintln!("   ✗ Rebuild failed: {:#}", e),
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn is_site_toml(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == "site.toml")
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            if rx.recv().await.is_ok() {
                yield Ok(Event::default().data("reload"));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
