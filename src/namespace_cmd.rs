use std::path::{Path, PathBuf};

use crate::commands::Project;
use crate::config::{CONFIG_FILE, Config};
use crate::error;
use crate::namespace::{is_builtin, validate_namespace_name};
use crate::scanner;

// ── CLI commands ──────────────────────────────────────────────────────

/// List all namespaces (built-in and configured), sorted alphabetically,
/// with the wrapper family that expands to each.
///
/// # Errors
///
/// Returns errors from config loading.
pub fn cmd_list() -> Result<(), error::Error> {
    let project = Project::load()?;
    let table = &project.config.namespaces;

    for (name, root) in table.iter() {
        let wrappers: Vec<String> = crate::namespace::Wrapper::ALL
            .into_iter()
            .filter(|w| return table.wrapper_namespace(*w) == Some(name))
            .map(|w| return format!("{}{}", w.open(), w.close()))
            .collect();
        if wrappers.is_empty() {
            println!("{name} -> {root}");
        } else {
            println!("{name} -> {root}  (wrapper {})", wrappers.join(" "));
        }
    }

    return Ok(());
}

/// Add a namespace mapping to the config file.
///
/// # Errors
///
/// Returns `Error::InvalidNamespace` for unusable names,
/// `Error::NamespaceExists` if the config already defines it,
/// or errors from config writing.
pub fn cmd_add(name: &str, path: &str) -> Result<(), error::Error> {
    let root = std::env::current_dir()?;
    validate_namespace_name(name)?;
    add_to_config(&root, name, path)?;
    crate::log!("namespace"; "added {name} -> {path}");
    return Ok(());
}

/// Remove a namespace from the config file. Refuses while markdown links
/// still use its prefix unless `force` is set.
///
/// # Errors
///
/// Returns `Error::NamespaceInUse` if links use it (without `--force`),
/// `Error::UnknownNamespace` if the config does not define it,
/// or errors from config operations.
pub fn cmd_remove(name: &str, force: bool) -> Result<(), error::Error> {
    let project = Project::load()?;

    if !force {
        let count = count_links_using(&project, name)?;
        if count > 0 {
            return Err(error::Error::NamespaceInUse {
                count,
                name: name.to_string(),
            });
        }
    }

    remove_from_config(&project.root, name)?;
    crate::log!("namespace"; "removed {name}");
    return Ok(());
}

/// Rename a namespace in the config file and across markdown link targets.
///
/// # Errors
///
/// Returns errors from config operations or markdown rewriting.
pub fn cmd_rename(old: &str, new: &str) -> Result<(), error::Error> {
    let root = std::env::current_dir()?;
    validate_namespace_name(new)?;

    rename_in_config(&root, old, new)?;

    let config = Config::load(&root)?;
    let rewritten = rewrite_in_markdown_files(&root, &config, old, new)?;

    crate::log!("namespace"; "renamed {old} -> {new} ({rewritten} files rewritten)");
    return Ok(());
}

// ── Config file editing ───────────────────────────────────────────────

/// Add a namespace mapping to `.colonlink.toml`.
/// Creates the `[namespaces]` table if it doesn't exist.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the config can't be parsed,
/// `Error::NamespaceExists` if the key is present, or `Error::Io` if
/// writing fails.
fn add_to_config(root: &Path, name: &str, namespace_path: &str) -> Result<(), error::Error> {
    let (config_path, mut doc) = read_config_doc(root)?;

    if !doc.contains_key("namespaces") {
        doc["namespaces"] = toml_edit::Item::Table(toml_edit::Table::new());
    }

    if doc["namespaces"].get(name).is_some() {
        return Err(error::Error::NamespaceExists { name: name.to_string() });
    }

    doc["namespaces"][name] = toml_edit::value(namespace_path);

    std::fs::write(&config_path, doc.to_string())?;
    return Ok(());
}

/// Parse a `.colonlink.toml` into a format-preserving document.
/// Returns an empty document if the file doesn't exist.
///
/// # Errors
///
/// Returns `Error::Io` on read failure or `Error::ParseFailed` on parse failure.
fn read_config_doc(root: &Path) -> Result<(PathBuf, toml_edit::DocumentMut), error::Error> {
    let config_path = root.join(CONFIG_FILE);
    let content = match std::fs::read_to_string(&config_path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(error::Error::Io(e)),
        Ok(c) => c,
    };

    let doc: toml_edit::DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
        return error::Error::ParseFailed {
            file: config_path.clone(),
            reason: e.to_string(),
        };
    })?;

    return Ok((config_path, doc));
}

/// Error for a name the config file does not define: built-in names get
/// their own variant since they exist without being configured.
fn not_configured(name: &str) -> error::Error {
    if is_builtin(name) {
        return error::Error::BuiltinNamespace { name: name.to_string() };
    }
    return error::Error::UnknownNamespace { name: name.to_string() };
}

/// Remove a namespace key from `.colonlink.toml`.
///
/// # Errors
///
/// Returns `Error::BuiltinNamespace` for a built-in name the file does not
/// override, or `Error::UnknownNamespace` if the name isn't configured.
fn remove_from_config(root: &Path, name: &str) -> Result<(), error::Error> {
    let (config_path, mut doc) = read_config_doc(root)?;

    let namespaces = doc
        .get_mut("namespaces")
        .and_then(toml_edit::Item::as_table_mut)
        .ok_or_else(|| return not_configured(name))?;

    if namespaces.remove(name).is_none() {
        return Err(not_configured(name));
    }

    std::fs::write(&config_path, doc.to_string())?;
    return Ok(());
}

/// Rename a namespace key in `.colonlink.toml`, keeping any wrapper that
/// pointed at it.
///
/// # Errors
///
/// Returns `Error::BuiltinNamespace` for a built-in old name the file does
/// not override, `Error::UnknownNamespace` if the old name isn't configured,
/// or `Error::NamespaceExists` if the new one already is.
fn rename_in_config(root: &Path, old: &str, new: &str) -> Result<(), error::Error> {
    let (config_path, mut doc) = read_config_doc(root)?;

    let namespaces = doc
        .get_mut("namespaces")
        .and_then(toml_edit::Item::as_table_mut)
        .ok_or_else(|| return not_configured(old))?;

    if namespaces.contains_key(new) {
        return Err(error::Error::NamespaceExists { name: new.to_string() });
    }

    let value = namespaces
        .remove(old)
        .ok_or_else(|| return not_configured(old))?;
    namespaces.insert(new, value);

    if let Some(wrappers) = doc.get_mut("wrappers").and_then(toml_edit::Item::as_table_mut) {
        for (_, item) in wrappers.iter_mut() {
            if item.as_str() == Some(old) {
                *item = toml_edit::value(new);
            }
        }
    }

    std::fs::write(&config_path, doc.to_string())?;
    return Ok(());
}

// ── Markdown scanning + rewriting ─────────────────────────────────────

/// Count markdown links whose target uses `name:` as a prefix.
///
/// # Errors
///
/// Returns errors from scanning.
fn count_links_using(project: &Project, name: &str) -> Result<usize, error::Error> {
    let prefix = format!("{name}:");
    let links = scanner::scan(&project.root, &project.config)?;
    return Ok(links
        .iter()
        .filter(|l| return l.raw_target.trim().starts_with(&prefix))
        .count());
}

/// Rewrite namespace prefixes in markdown link targets across all scanned
/// files. Returns how many files changed.
///
/// # Errors
///
/// Returns `Error::Io` on file read/write failures.
fn rewrite_in_markdown_files(root: &Path, config: &Config, old: &str, new: &str) -> Result<usize, error::Error> {
    let old_prefix = format!("]({old}:");
    let new_prefix = format!("]({new}:");
    let mut rewritten = 0_usize;

    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| return e.path().extension().is_some_and(|ext| return ext == "md"))
    {
        let md_path = entry.path();
        let relative = md_path.strip_prefix(root).unwrap_or(md_path);
        if !config.should_scan(&relative.to_string_lossy()) {
            continue;
        }

        let content = std::fs::read_to_string(md_path)?;
        if content.contains(&old_prefix) {
            let updated = content.replace(&old_prefix, &new_prefix);
            std::fs::write(md_path, updated)?;
            rewritten = rewritten.saturating_add(1);
            crate::debug!("namespace"; "rewrote {}", relative.display());
        }
    }

    return Ok(rewritten);
}
