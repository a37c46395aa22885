//! `adloc serve` — run the HTTP endpoints.

use std::net::SocketAddr;
use std::path::Path;

use adloc_core::PlatformTree;
use adloc_server::AppState;
use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::config::AdlocConfig;

/// Start the server and block until Ctrl-C.
///
/// `bind` and `data` override the `[server] bind` and `[data] preload`
/// settings.
pub fn run(
    config: &AdlocConfig,
    config_dir: &Path,
    bind: Option<&str>,
    data: Option<&Path>,
) -> Result<()> {
    let addr: SocketAddr = bind
        .unwrap_or(config.server.bind.as_str())
        .parse()
        .context("invalid bind address")?;

    let tree = initial_tree(config, config_dir, data)?;
    let state = AppState::new(tree);

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(async move {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        adloc_server::serve(listener, state)
            .await
            .context("serving HTTP")
    })
}

/// The tree the server starts with: empty, or loaded from the preload file.
fn initial_tree(
    config: &AdlocConfig,
    config_dir: &Path,
    data: Option<&Path>,
) -> Result<PlatformTree> {
    let mut tree = config.empty_tree()?;
    let preload = data
        .map(Path::to_path_buf)
        .or_else(|| config.preload_path(config_dir));
    if let Some(path) = preload {
        tree.load_file(&path)
            .with_context(|| format!("preloading {}", path.display()))?;
        tracing::info!(
            file = %path.display(),
            platforms = tree.platform_count(),
            "preloaded platforms"
        );
    }
    Ok(tree)
}
