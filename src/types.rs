/// Core domain types for shorthand links, requests, and resolutions.
use std::path::{Path, PathBuf};

/// Default document appended to any target that ends in a path separator.
pub const DEFAULT_INDEX_FILE: &str = "index.md";

/// A `[label](target)` occurrence found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOccurrence {
    /// One-based byte column of the opening `[`.
    pub column: u32,
    /// Visible label text between the brackets.
    pub display_text: String,
    /// One-based line number of the link in the source file.
    pub line: u32,
    /// Shorthand exactly as written between the parentheses. May be empty.
    pub raw_target: String,
    /// Markdown file containing the link.
    pub source: PathBuf,
}

impl LinkOccurrence {
    /// Build a resolution request for this occurrence.
    pub fn request(&self, mode: OutputMode) -> LinkRequest {
        return LinkRequest {
            display_text: self.display_text.clone(),
            mode,
            raw_target: self.raw_target.clone(),
            source: Some(self.source.clone()),
        };
    }
}

/// The single input unit of the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    /// The link's visible label, spliced in at colon placeholders.
    pub display_text: String,
    /// Caller-selected output shape.
    pub mode: OutputMode,
    /// Shorthand text from the link target position.
    pub raw_target: String,
    /// Document containing the link. `None` when the caller has no anchor,
    /// which is the only case that cannot be resolved.
    pub source: Option<PathBuf>,
}

impl LinkRequest {
    /// Request anchored at `source` with the given target and label.
    pub fn new(raw_target: &str, display_text: &str, source: &Path, mode: OutputMode) -> Self {
        return Self {
            display_text: display_text.to_string(),
            mode,
            raw_target: raw_target.to_string(),
            source: Some(source.to_path_buf()),
        };
    }
}

/// Output shape requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputMode {
    /// Return the absolute location instead of a display string.
    pub as_absolute_location: bool,
    /// Format display strings relative to the workspace root instead of the
    /// document's directory.
    pub relative_to_workspace_root: bool,
}

impl OutputMode {
    /// Absolute location output.
    pub const ABSOLUTE: Self = Self {
        as_absolute_location: true,
        relative_to_workspace_root: false,
    };
    /// Display string relative to the document's directory.
    pub const DOCUMENT_RELATIVE: Self = Self {
        as_absolute_location: false,
        relative_to_workspace_root: false,
    };
    /// Display string relative to the workspace root.
    pub const WORKSPACE_RELATIVE: Self = Self {
        as_absolute_location: false,
        relative_to_workspace_root: true,
    };
}

/// Outcome of resolving one shorthand link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Path string for display. Relative to the requested anchor, or the
    /// absolute path when the target does not lie under it.
    Display(String),
    /// Protocol link, passed through after colon substitution. Never joined
    /// onto a directory or rewritten by namespace defaults.
    External(String),
    /// Absolute, normalized location.
    Location(PathBuf),
    /// No source location was available to anchor a relative target.
    Unresolved,
}

impl Resolution {
    /// Text form used by the CLI and the rewrite hook. Empty for `Unresolved`.
    pub fn as_text(&self) -> String {
        return match self {
            Self::Display(text) | Self::External(text) => text.clone(),
            Self::Location(path) => path.display().to_string(),
            Self::Unresolved => String::new(),
        };
    }

    /// Hover text naming the file the link opens.
    pub fn tooltip(&self) -> String {
        let text = self.as_text();
        let file = text.rsplit('/').next().unwrap_or("");
        return format!("Open: {file}");
    }
}

/// Knobs that are not part of the namespace table but shape every resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// File name appended to targets that end in `/`.
    pub index_file: String,
    /// Whether colons after a `scheme://` prefix are placeholders.
    pub url_placeholders: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        return Self {
            index_file: DEFAULT_INDEX_FILE.to_string(),
            url_placeholders: true,
        };
    }
}
