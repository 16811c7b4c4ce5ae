//! Namespace table and namespace default application.
//!
//! The table maps a shorthand prefix (`blocks:`, `comps:`) to the directory
//! its payload lives under, and maps each wrapper family (`[..]`, `(..)`)
//! to the namespace it expands to. Stages borrow it immutably.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::placeholder::has_protocol;
use crate::types::ResolveOptions;

/// Built-in root for the `blocks` namespace.
pub const BLOCKS_DEFAULT: &str = "src/cavalion-blocks";

/// Built-in root for the `comps` namespace.
pub const COMPS_DEFAULT: &str = "src/vcl-comps";

/// Names registered in every table before configuration is applied.
pub const BUILTIN_NAMESPACES: [&str; 2] = ["blocks", "comps"];

/// Delimiter pair that wraps a payload and selects a namespace by shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Wrapper {
    /// `[payload]`
    Brackets,
    /// `(payload)`
    Parens,
}

impl Wrapper {
    /// Every wrapper family, in precedence order.
    pub const ALL: [Self; 2] = [Self::Brackets, Self::Parens];

    /// Closing delimiter.
    pub const fn close(self) -> char {
        return match self {
            Self::Brackets => ']',
            Self::Parens => ')',
        };
    }

    /// Config key naming this family.
    pub const fn key(self) -> &'static str {
        return match self {
            Self::Brackets => "brackets",
            Self::Parens => "parens",
        };
    }

    /// Opening delimiter.
    pub const fn open(self) -> char {
        return match self {
            Self::Brackets => '[',
            Self::Parens => '(',
        };
    }

    /// Parse a config key.
    pub fn from_key(key: &str) -> Option<Self> {
        return Self::ALL.into_iter().find(|w| return w.key() == key);
    }

    /// Payload between the delimiters if `target` is wrapped in this family.
    pub fn payload(self, target: &str) -> Option<&str> {
        return target.strip_prefix(self.open())?.strip_suffix(self.close());
    }
}

/// Immutable shorthand configuration shared by the pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTable {
    /// Dormant fallback root for targets with no namespace. Never set from
    /// configuration files.
    root_default: Option<String>,
    /// Namespace name to default root directory.
    roots: BTreeMap<String, String>,
    /// Wrapper family to namespace name.
    wrappers: BTreeMap<Wrapper, String>,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.roots.insert("blocks".to_string(), BLOCKS_DEFAULT.to_string());
        table.roots.insert("comps".to_string(), COMPS_DEFAULT.to_string());
        table.wrappers.insert(Wrapper::Brackets, "blocks".to_string());
        table.wrappers.insert(Wrapper::Parens, "comps".to_string());
        return table;
    }
}

impl NamespaceTable {
    /// Table with no namespaces and no wrappers.
    pub fn empty() -> Self {
        return Self {
            root_default: None,
            roots: BTreeMap::new(),
            wrappers: BTreeMap::new(),
        };
    }

    /// Register or replace a namespace.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidNamespace` if `name` cannot be a prefix.
    pub fn insert(&mut self, name: &str, root: &str) -> Result<(), Error> {
        validate_namespace_name(name)?;
        self.roots.insert(name.to_string(), root.to_string());
        return Ok(());
    }

    /// Registered namespaces with their roots, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        return self.roots.iter().map(|(name, root)| return (name.as_str(), root.as_str()));
    }

    /// Default root for `name`.
    pub fn root(&self, name: &str) -> Option<&str> {
        return self.roots.get(name).map(String::as_str);
    }

    /// Fallback root for un-namespaced targets, if one was activated.
    pub fn root_default(&self) -> Option<&str> {
        return self.root_default.as_deref();
    }

    /// Point a wrapper family at a registered namespace.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownNamespace` if `name` is not registered.
    pub fn set_wrapper(&mut self, wrapper: Wrapper, name: &str) -> Result<(), Error> {
        if !self.roots.contains_key(name) {
            return Err(Error::UnknownNamespace {
                name: name.to_string(),
            });
        }
        self.wrappers.insert(wrapper, name.to_string());
        return Ok(());
    }

    /// Split `target` into a registered namespace and its payload.
    pub fn split_prefix<'t>(&self, target: &'t str) -> Option<(&str, &'t str)> {
        let (name, payload) = target.split_once(':')?;
        let (key, _) = self.roots.get_key_value(name)?;
        return Some((key.as_str(), payload));
    }

    /// Activate a fallback root for targets that carry no namespace.
    #[allow(dead_code, reason = "dormant extension point; no config key activates it")]
    #[must_use]
    pub fn with_root_default(mut self, root: &str) -> Self {
        self.root_default = Some(root.to_string());
        return self;
    }

    /// Namespace a wrapper family expands to.
    pub fn wrapper_namespace(&self, wrapper: Wrapper) -> Option<&str> {
        return self.wrappers.get(&wrapper).map(String::as_str);
    }
}

/// Expand a namespace prefix into its default root.
///
/// Protocol links are returned unchanged. A namespaced payload that already
/// starts with `./` or `/` keeps its own anchor; otherwise it is placed under
/// the namespace root. Targets without a namespace stay relative to the
/// document unless the table's root default was activated. A result ending
/// in `/` gets the index file appended.
pub fn apply_namespace_defaults(target: &str, table: &NamespaceTable, options: &ResolveOptions) -> String {
    if has_protocol(target) {
        return target.to_string();
    }

    let mut expanded = match table.split_prefix(target) {
        Some((name, payload)) => under_root(table.root(name).unwrap_or(""), payload),
        None => match table.root_default() {
            Some(root) => under_root(root, target),
            None => target.to_string(),
        },
    };

    if expanded.ends_with('/') {
        expanded.push_str(&options.index_file);
    }
    return expanded;
}

/// Whether `name` is one of the built-in namespaces.
pub fn is_builtin(name: &str) -> bool {
    return BUILTIN_NAMESPACES.contains(&name);
}

/// Whether `payload` carries its own relative or absolute anchor.
fn is_anchored(payload: &str) -> bool {
    return payload.starts_with("./") || payload.starts_with('/');
}

/// Place `payload` under `root` unless it is already anchored.
fn under_root(root: &str, payload: &str) -> String {
    let root = root.trim_end_matches('/');
    if is_anchored(payload) || root.is_empty() {
        return payload.to_string();
    }
    return format!("{root}/{payload}");
}

/// Check that `name` can be used as a shorthand prefix.
///
/// # Errors
///
/// Returns `Error::InvalidNamespace` for empty names or names containing
/// anything other than ASCII alphanumerics, `-`, or `_`.
pub fn validate_namespace_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::InvalidNamespace {
            name: name.to_string(),
            reason: "name is empty".to_string(),
        });
    }
    if let Some(bad) = name.chars().find(|c| return !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_')) {
        return Err(Error::InvalidNamespace {
            name: name.to_string(),
            reason: format!("character `{bad}` is not allowed"),
        });
    }
    return Ok(());
}
