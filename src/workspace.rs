//! Workspace root lookup: the one collaborator the resolver consults.

use std::path::{Path, PathBuf};

use crate::paths::normalize_path;

/// Answers which workspace folder encloses a document. Implementations are
/// expected to query already-loaded state and never block.
pub trait WorkspaceLookup {
    /// Root of the workspace containing `document`, or `None` when the
    /// document belongs to no workspace.
    fn workspace_root(&self, document: &Path) -> Option<PathBuf>;
}

/// A fixed set of workspace folders. When folders nest, the deepest one that
/// contains the document wins.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceFolders {
    /// Normalized folder roots.
    roots: Vec<PathBuf>,
}

impl WorkspaceFolders {
    /// Register `roots` as workspace folders.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let roots = roots.into_iter().map(|r| return normalize_path(r.as_ref())).collect();
        return Self { roots };
    }

    /// Registered folder roots in registration order.
    pub fn roots(&self) -> &[PathBuf] {
        return &self.roots;
    }
}

impl WorkspaceLookup for WorkspaceFolders {
    fn workspace_root(&self, document: &Path) -> Option<PathBuf> {
        let document = normalize_path(document);
        return self
            .roots
            .iter()
            .filter(|root| return document.starts_with(root))
            .max_by_key(|root| return root.components().count())
            .cloned();
    }
}
