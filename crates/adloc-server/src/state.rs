//! Shared hierarchy behind the HTTP handlers.

use std::sync::Arc;

use adloc_core::{PlatformError, PlatformTree};
use tokio::sync::RwLock;

use crate::error::UploadError;

/// The hierarchy shared by all requests.
///
/// Lookups hold the read lock; a load holds the write lock across the whole
/// parse-or-clear step, so a lookup never sees a half-built tree.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    tree: Arc<RwLock<PlatformTree>>,
}

impl AppState {
    pub fn new(tree: PlatformTree) -> Self {
        Self {
            tree: Arc::new(RwLock::new(tree)),
        }
    }

    pub fn tree(&self) -> &RwLock<PlatformTree> {
        &self.tree
    }

    /// Names of the platforms covering `path`.
    pub async fn lookup(&self, path: &str) -> Result<Vec<String>, PlatformError> {
        let tree = self.tree.read().await;
        let names = tree.find_names(path)?;
        Ok(names.into_iter().map(str::to_string).collect())
    }

    /// Replace the hierarchy with `text`. On failure nothing is kept.
    pub async fn load(&self, text: &str) -> Result<(), UploadError> {
        let mut tree = self.tree.write().await;
        match tree.parse(text) {
            Ok(()) => Ok(()),
            Err(err) => {
                let root = tree.root();
                tree.clear(root)?;
                Err(err.into())
            }
        }
    }

    /// Drop everything loaded so far.
    pub async fn clear(&self) -> Result<(), PlatformError> {
        let mut tree = self.tree.write().await;
        let root = tree.root();
        tree.clear(root)
    }

    pub async fn platform_count(&self) -> usize {
        self.tree.read().await.platform_count()
    }
}
