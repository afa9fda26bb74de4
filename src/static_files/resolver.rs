//! Maps request paths onto the document root.

use crate::static_files::listing;
use std::path::{Path, PathBuf};
use tokio::fs;

const INDEX_FILE: &str = "index.html";
const PARENT_ENTRY: &str = "..";

/// What to do with a request path. Exactly one is produced per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Directory with an index.html; serve that file
    ServeIndexFile(PathBuf),
    /// Directory without an index; `entries` are sorted and include ".."
    ServeDirectoryListing { uri: String, entries: Vec<String> },
    /// Directory requested without its trailing slash
    Redirect(String),
    ServeFile(PathBuf),
    NotFound,
}

/// Resolves request paths against a document root.
///
/// Paths never resolve outside the root: a `..` climbing above it, or a
/// symlink pointing out of it, yields `NotFound`.
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    root: PathBuf,
}

impl ResourceResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decides how to serve `uri`, a path without query string.
    pub async fn resolve(&self, uri: &str) -> Decision {
        let Some(target) = self.confine(uri) else {
            tracing::warn!(uri, "Path escapes document root");
            return Decision::NotFound;
        };

        let Some(root) = canonical(&self.root).await else {
            tracing::error!(root = %self.root.display(), "Document root is not accessible");
            return Decision::NotFound;
        };

        let Some(target) = canonical(&target).await else {
            return Decision::NotFound;
        };

        if !target.starts_with(&root) {
            tracing::warn!(uri, "Path resolves outside document root");
            return Decision::NotFound;
        }

        let Ok(meta) = fs::metadata(&target).await else {
            return Decision::NotFound;
        };

        if meta.is_dir() {
            if uri.ends_with('/') {
                return self.resolve_directory(uri, &root, &target).await;
            }
            return Decision::Redirect(format!("{}/", uri));
        }

        if meta.is_file() && !uri.ends_with('/') {
            return Decision::ServeFile(target);
        }

        Decision::NotFound
    }

    async fn resolve_directory(&self, uri: &str, root: &Path, dir: &Path) -> Decision {
        let index = dir.join(INDEX_FILE);
        if let Some(index) = canonical(&index).await {
            let is_file = fs::metadata(&index).await.map(|m| m.is_file()).unwrap_or(false);
            if is_file && index.starts_with(root) {
                return Decision::ServeIndexFile(index);
            }
        }

        match list_entries(dir).await {
            Ok(entries) => Decision::ServeDirectoryListing {
                uri: uri.to_string(),
                entries,
            },
            Err(e) => {
                tracing::warn!(uri, error = %e, "Cannot list directory");
                Decision::NotFound
            }
        }
    }

    /// Joins the components of `uri` onto the root, normalising "." and
    /// "..". Returns `None` when a ".." would leave the root.
    fn confine(&self, uri: &str) -> Option<PathBuf> {
        let mut parts: Vec<&str> = Vec::new();

        for part in uri.split('/') {
            match part {
                "" | "." => continue,
                ".." => {
                    parts.pop()?;
                }
                p if p.contains('\0') => return None,
                p => parts.push(p),
            }
        }

        let mut path = self.root.clone();
        path.extend(parts);
        Some(path)
    }
}

async fn canonical(path: &Path) -> Option<PathBuf> {
    fs::canonicalize(path).await.ok()
}

/// Names in `dir` plus "..", sorted by their rendered list item.
async fn list_entries(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = vec![PARENT_ENTRY.to_string()];

    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        entries.push(entry.file_name().to_string_lossy().into_owned());
    }

    entries.sort_by_cached_key(|name| listing::list_item(name));
    Ok(entries)
}
