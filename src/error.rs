/// Crate-level error types for colonlink diagnostics.
use std::path::PathBuf;

/// Errors raised by the shell around the resolver: config loading, file I/O,
/// namespace editing, and watching. Resolution itself never fails with an
/// `Error`; it degrades to `Resolution::Unresolved` instead.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A built-in namespace was targeted by a command that only edits the config file.
    #[error("namespace `{name}` is built in and not defined in .colonlink.toml")]
    BuiltinNamespace {
        /// Namespace identifier.
        name: String,
    },

    /// A document or path named on the command line does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A namespace name cannot be used as a shorthand prefix.
    #[error("invalid namespace `{name}`: {reason}")]
    InvalidNamespace {
        /// Namespace identifier as written.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// `namespace add` was asked to register a name that is already configured.
    #[error("namespace `{name}` already exists")]
    NamespaceExists {
        /// Namespace identifier.
        name: String,
    },

    /// A namespace still has links using it and cannot be removed without `--force`.
    #[error("namespace `{name}` is in use by {count} links (use --force to remove)")]
    NamespaceInUse {
        /// Number of links still using this namespace.
        count: usize,
        /// Namespace identifier.
        name: String,
    },

    /// A file exists but its contents could not be parsed.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// No configured namespace matches the given name.
    #[error("unknown namespace: `{name}`")]
    UnknownNamespace {
        /// Namespace identifier that was not found.
        name: String,
    },

    /// The filesystem watcher could not be set up.
    #[error("watch failed: {reason}")]
    WatchFailed {
        /// Description of the watcher failure.
        reason: String,
    },
}
