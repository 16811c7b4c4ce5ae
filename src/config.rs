use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::namespace::{NamespaceTable, Wrapper};
use crate::paths::normalize_path;
use crate::types::{DEFAULT_INDEX_FILE, ResolveOptions};
use crate::workspace::WorkspaceFolders;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = ".colonlink.toml";

/// Project configuration loaded from `.colonlink.toml`.
/// Include/exclude patterns are path prefixes applied to markdown source files.
pub struct Config {
    /// Skip markdown files under these prefixes.
    exclude: Vec<String>,
    /// Only scan markdown files under these prefixes (empty = everything).
    include: Vec<String>,
    /// Namespace table handed to the resolver.
    pub namespaces: NamespaceTable,
    /// Index file and URL placeholder settings.
    pub options: ResolveOptions,
    /// Workspace folders, relative to the config root.
    pub workspaces: Vec<String>,
}

/// Raw TOML structure for `.colonlink.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ColonlinkTomlConfig {
    /// Excluded path prefixes.
    #[serde(default)]
    exclude: Vec<String>,
    /// Included path prefixes.
    #[serde(default)]
    include: Vec<String>,
    /// Index document for directory targets.
    index_file: Option<String>,
    /// Extra or overriding namespaces.
    #[serde(default)]
    namespaces: BTreeMap<String, String>,
    /// Colon substitution inside URLs.
    url_placeholders: Option<bool>,
    /// Workspace folders.
    workspaces: Option<Vec<String>>,
    /// Wrapper family to namespace mapping.
    #[serde(default)]
    wrappers: BTreeMap<String, String>,
}

impl Config {
    /// Load config from `.colonlink.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. A file that exists but is
    /// malformed is an error, never a silent fallback to defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed, `Error::InvalidNamespace`
    /// for unusable namespace names, or `Error::UnknownNamespace` when a
    /// wrapper names an unregistered namespace.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&path, &content);
    }

    /// Parse config content. `path` is only used in diagnostics.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], minus I/O.
    pub fn parse(path: &Path, content: &str) -> Result<Self, Error> {
        let raw: ColonlinkTomlConfig = toml::from_str(content)?;

        let mut namespaces = NamespaceTable::default();
        for (name, root) in &raw.namespaces {
            namespaces.insert(name, root)?;
        }
        for (key, name) in &raw.wrappers {
            let Some(wrapper) = Wrapper::from_key(key) else {
                return Err(Error::ParseFailed {
                    file: path.to_path_buf(),
                    reason: format!("unknown wrapper `{key}` (expected `brackets` or `parens`)"),
                });
            };
            namespaces.set_wrapper(wrapper, name)?;
        }

        let options = ResolveOptions {
            index_file: raw.index_file.unwrap_or_else(|| return DEFAULT_INDEX_FILE.to_string()),
            url_placeholders: raw.url_placeholders.unwrap_or(true),
        };

        return Ok(Self {
            exclude: raw.exclude,
            include: raw.include,
            namespaces,
            options,
            workspaces: raw.workspaces.unwrap_or_else(|| return vec![".".to_string()]),
        });
    }

    /// Default config: built-in namespaces, everything scanned, the root as
    /// the only workspace folder.
    pub fn defaults() -> Self {
        return Self {
            exclude: Vec::new(),
            include: Vec::new(),
            namespaces: NamespaceTable::default(),
            options: ResolveOptions::default(),
            workspaces: vec![".".to_string()],
        };
    }

    /// Check whether a markdown file path should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }

    /// Workspace folders resolved against `root`.
    pub fn workspace_folders(&self, root: &Path) -> WorkspaceFolders {
        let roots: Vec<PathBuf> = self
            .workspaces
            .iter()
            .map(|w| return normalize_path(&root.join(w)))
            .collect();
        return WorkspaceFolders::new(roots);
    }
}
