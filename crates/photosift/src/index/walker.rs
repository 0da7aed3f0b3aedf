use crate::config::Config;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Options for walking a photo tree
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    pub follow_symlinks: bool,
    /// Directory names pruned wherever they appear below the root
    pub vendor_dirs: Vec<String>,
    /// Lowercase extensions to keep; empty keeps every regular file
    pub extensions: Vec<String>,
}

impl From<&Config> for WalkOptions {
    fn from(config: &Config) -> Self {
        Self {
            follow_symlinks: config.follow_symlinks,
            vendor_dirs: config.vendor_dirs.clone(),
            extensions: config.extensions.clone(),
        }
    }
}

/// Enumerates candidate media files under a root.
///
/// Each call to [`TreeWalker::walk`] starts a fresh traversal; the returned
/// iterator is lazy and yields regular files only, in filesystem order.
/// With `follow_symlinks` the walk descends into linked directories, but a
/// symlink entry is never yielded itself.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    follow_symlinks: bool,
    vendor_dirs: HashSet<String>,
    extensions: HashSet<String>,
}

impl TreeWalker {
    pub fn new(options: WalkOptions) -> Self {
        Self {
            follow_symlinks: options.follow_symlinks,
            vendor_dirs: options.vendor_dirs.into_iter().collect(),
            extensions: options
                .extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
        }
    }

    pub fn walk<'a>(&'a self, root: &Path) -> impl Iterator<Item = PathBuf> + 'a {
        WalkDir::new(root)
            .follow_links(self.follow_symlinks)
            .into_iter()
            .filter_entry(move |entry| !self.is_vendor_dir(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Walk error: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && !entry.path_is_symlink())
            .map(DirEntry::into_path)
            .filter(move |path| self.accepts_extension(path))
    }

    fn is_vendor_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .vendor_dirs
                .contains(entry.file_name().to_string_lossy().as_ref())
    }

    fn accepts_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .map(|e| self.extensions.contains(&e.to_string_lossy().to_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for TreeWalker {
    fn default() -> Self {
        Self::new(WalkOptions::from(&Config::default()))
    }
}
