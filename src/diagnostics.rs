use crate::config::CONFIG_FILE;
use crate::error::Error;

/// Bold on.
const BOLD: &str = "\x1b[1m";
/// Reset attributes.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is
/// one, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::BuiltinNamespace { name } => render_builtin_namespace(name),
        Error::InvalidNamespace { name, reason } => render_invalid_namespace(name, reason),
        Error::NamespaceExists { name } => render_namespace_exists(name),
        Error::NamespaceInUse { name, count } => render_namespace_in_use(name, *count),
        Error::UnknownNamespace { name } => render_unknown_namespace(name),
        Error::FileNotFound { .. }
        | Error::Io(_)
        | Error::ParseFailed { .. }
        | Error::TomlDe(_)
        | Error::WatchFailed { .. } => render_generic(e),
    };
}

/// Render the variants that need no fix section.
fn render_generic(e: &Error) -> String {
    return match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::ParseFailed { file, reason } => format!("\
# Error: Parse Failed

Could not parse `{}`: {reason}
", file.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Correct `{CONFIG_FILE}`, or run `colonlink info` for the accepted keys.
"),
        Error::WatchFailed { reason } => format!("\
# Error: Watch Failed

{reason}
"),
        // Already handled in render_error, but need exhaustive match.
        Error::BuiltinNamespace { .. }
        | Error::InvalidNamespace { .. }
        | Error::NamespaceExists { .. }
        | Error::NamespaceInUse { .. }
        | Error::UnknownNamespace { .. } => format!("\
# Error

{e}
"),
    };
}

/// Render `Error::BuiltinNamespace`.
fn render_builtin_namespace(name: &str) -> String {
    return format!(
        "\
# Error: Built-in Namespace

`{name}` is built in and `{CONFIG_FILE}` does not define it, so there is
nothing to remove or rename.

## Fix

Override its root instead:

    [namespaces]
    {name} = \"path/to/{name}\"

Or point a wrapper at another namespace under `[wrappers]`.
"
    );
}

/// Render `Error::InvalidNamespace`.
fn render_invalid_namespace(name: &str, reason: &str) -> String {
    return format!(
        "\
# Error: Invalid Namespace

`{name}` cannot be used as a shorthand prefix: {reason}.

## Fix

Use only ASCII letters, digits, `-` and `_`.
"
    );
}

/// Render `Error::NamespaceExists`.
fn render_namespace_exists(name: &str) -> String {
    return format!(
        "\
# Error: Namespace Exists

Namespace `{name}` is already configured in `{CONFIG_FILE}`.

## Fix

Pick another name, or remove the existing one first:

    colonlink namespace remove {name}
"
    );
}

/// Render `Error::NamespaceInUse`.
fn render_namespace_in_use(name: &str, count: usize) -> String {
    return format!(
        "\
# Error: Namespace In Use

Namespace `{name}` is used by {count} markdown links.

## Fix

Remove all links starting with `{name}:` first, or force removal:

    colonlink namespace remove {name} --force
"
    );
}

/// Render `Error::UnknownNamespace`.
fn render_unknown_namespace(name: &str) -> String {
    return format!(
        "\
# Error: Unknown Namespace

Namespace `{name}` is not configured.

## Fix

Add it to `{CONFIG_FILE}`:

    [namespaces]
    {name} = \"path/to/{name}\"

Or run:

    colonlink namespace add {name} path/to/{name}
"
    );
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn unknown_namespace_suggests_add_command() {
        let md = render_error(&Error::UnknownNamespace { name: "docs".to_string() });
        assert!(md.starts_with("# Error: Unknown Namespace"));
        assert!(md.contains("colonlink namespace add docs path/to/docs"));
    }

    #[test]
    fn builtin_namespace_does_not_suggest_adding() {
        let md = render_error(&Error::BuiltinNamespace { name: "blocks".to_string() });
        assert!(md.starts_with("# Error: Built-in Namespace"));
        assert!(!md.contains("namespace add"));
    }

    #[test]
    fn in_use_mentions_force() {
        let md = render_error(&Error::NamespaceInUse {
            count: 3,
            name: "blocks".to_string(),
        });
        assert!(md.contains("used by 3 markdown links"));
        assert!(md.contains("--force"));
    }

    #[test]
    fn file_not_found_names_the_path() {
        let md = render_error(&Error::FileNotFound {
            path: std::path::PathBuf::from("docs/missing.md"),
        });
        assert!(md.contains("`docs/missing.md` does not exist."));
    }
}
