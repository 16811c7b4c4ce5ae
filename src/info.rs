use std::path::Path;

use serde::Serialize;

use crate::config::{CONFIG_FILE, Config};
use crate::namespace::Wrapper;

/// Shorthand grammar rows. Descriptions start in the same column.
const GRAMMAR: &str = "    [label]()              label as a path beside the document (`dir/` -> `dir/index.md`)
    [label]([])            blocks:label
    [label]([.])           ./label beside the document
    [label]([!])           blocks:!label
    [label]([X])           blocks:X
    [label](())            comps:label   ((.), (!), (X) likewise)
    [label]({})            {label} beside the document
    [label](dir/:.md)      colon is replaced by the label: dir/label.md
    [label](blocks:X)      X under the blocks root
    [label](/X)            X under the workspace root
    [label](https://..)    passed through (colons after :// are placeholders)
";

/// Output the colonlink reference card.
pub fn run(json: bool) {
    let root = std::env::current_dir().unwrap_or_default();
    let state = gather_state(&root);

    if json {
        print_json(&state);
    } else {
        print_markdown(&state);
    }
}

// ── State gathering ───────────────────────────────────────────────────

/// What the reference card reports about the working directory.
struct CurrentState {
    /// Why `.colonlink.toml` could not be loaded, if it could not.
    config_error: Option<String>,
    /// Whether `.colonlink.toml` exists.
    config_found: bool,
    /// Index file appended to directory targets.
    index_file: String,
    /// Namespace name and root, sorted by name.
    namespaces: Vec<(String, String)>,
    /// Wrapper delimiters and the namespace each expands to.
    wrappers: Vec<(String, String)>,
}

/// Collect the current configuration. A config that fails to load is
/// reported, and the built-in defaults are shown in its place.
fn gather_state(root: &Path) -> CurrentState {
    let config_found = root.join(CONFIG_FILE).exists();
    let (config, config_error) = match Config::load(root) {
        Ok(c) => (c, None),
        Err(e) => (Config::defaults(), Some(e.to_string())),
    };

    let namespaces = config
        .namespaces
        .iter()
        .map(|(name, path)| return (name.to_string(), path.to_string()))
        .collect();
    let wrappers = Wrapper::ALL
        .into_iter()
        .filter_map(|w| {
            let ns = config.namespaces.wrapper_namespace(w)?;
            return Some((format!("{}{}", w.open(), w.close()), ns.to_string()));
        })
        .collect();

    return CurrentState {
        config_error,
        config_found,
        index_file: config.options.index_file,
        namespaces,
        wrappers,
    };
}

// ── Markdown output ───────────────────────────────────────────────────

/// Print the human-readable card.
fn print_markdown(state: &CurrentState) {
    let version = env!("CARGO_PKG_VERSION");
    print_markdown_header(version);
    print_markdown_state(state);
}

/// Print the static part of the card.
fn print_markdown_header(version: &str) {
    print!(
        "\
# colonlink {version}

Shorthand link targets for markdown, resolved to real paths.

## Shorthand Syntax

{GRAMMAR}
## Commands

    colonlink resolve <doc> [target] --text <label>   Resolve one shorthand
    colonlink links                                    List every link and its resolution
    colonlink check                                    Verify every link exists (exit 0/2)
    colonlink render <doc>                             Print doc with hrefs rewritten
    colonlink namespace list|add|rename|remove         Manage namespaces
    colonlink watch                                    Re-check on markdown changes

## Configuration (.colonlink.toml)

    include = [\"docs/\"]                 # only scan these paths
    exclude = [\"docs/archive/\"]         # skip these paths
    index_file = \"index.md\"             # appended to targets ending in /
    url_placeholders = true             # colons after :// are placeholders
    workspaces = [\".\"]                  # workspace folders for /-rooted targets

    [namespaces]
    blocks = \"src/cavalion-blocks\"      # blocks:x -> src/cavalion-blocks/x

    [wrappers]
    brackets = \"blocks\"
    parens = \"comps\"

## Exit Codes

| Code | Meaning |
|------|---------|
| 0    | Success / all links resolve |
| 2    | Missing or unresolved links found |
| 3    | Runtime error |

## Current State

"
    );
}

/// Print the configuration found in the working directory.
fn print_markdown_state(state: &CurrentState) {
    if let Some(reason) = &state.config_error {
        println!("Config:     {CONFIG_FILE} (invalid, showing defaults: {reason})");
    } else if state.config_found {
        println!("Config:     {CONFIG_FILE} (found)");
    } else {
        println!("Config:     {CONFIG_FILE} (not found)");
    }
    println!("Index file: {}", state.index_file);

    if state.namespaces.is_empty() {
        println!("Namespaces: (none)");
    } else {
        let ns_list = state
            .namespaces
            .iter()
            .map(|(name, path)| return format!("{name} -> {path}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Namespaces: {ns_list}");
    }

    let wrapper_list = state
        .wrappers
        .iter()
        .map(|(delims, name)| return format!("{delims} -> {name}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Wrappers:   {wrapper_list}");
}

// ── JSON output ───────────────────────────────────────────────────────

/// Top-level JSON card.
#[derive(Serialize)]
struct InfoJson {
    /// Current configuration.
    current_state: StateJson,
    /// Exit codes and meanings.
    exit_codes: Vec<ExitCodeInfo>,
    /// Recognized shorthand literals.
    grammar: Vec<&'static str>,
    /// Crate version.
    version: String,
}

/// One exit code entry.
#[derive(Serialize)]
struct ExitCodeInfo {
    /// Process exit code.
    code: u8,
    /// What it means.
    meaning: String,
}

/// Current configuration in JSON form.
#[derive(Serialize)]
struct StateJson {
    /// Load error, when the config is invalid.
    config_error: Option<String>,
    /// Whether `.colonlink.toml` exists.
    config_found: bool,
    /// Index file appended to directory targets.
    index_file: String,
    /// Namespace table.
    namespaces: Vec<NamespaceJson>,
    /// Wrapper mapping.
    wrappers: Vec<NamespaceJson>,
}

/// A name/path pair.
#[derive(Serialize)]
struct NamespaceJson {
    /// Namespace name or wrapper delimiters.
    name: String,
    /// Root directory or namespace name.
    path: String,
}

/// Print the JSON card.
fn print_json(state: &CurrentState) {
    let pairs = |list: &[(String, String)]| -> Vec<NamespaceJson> {
        return list
            .iter()
            .map(|(name, path)| {
                return NamespaceJson {
                    name: name.clone(),
                    path: path.clone(),
                };
            })
            .collect();
    };

    let info = InfoJson {
        current_state: StateJson {
            config_error: state.config_error.clone(),
            config_found: state.config_found,
            index_file: state.index_file.clone(),
            namespaces: pairs(&state.namespaces),
            wrappers: pairs(&state.wrappers),
        },
        exit_codes: vec![
            ExitCodeInfo { code: 0, meaning: "Success / all links resolve".to_string() },
            ExitCodeInfo { code: 2, meaning: "Missing or unresolved links found".to_string() },
            ExitCodeInfo { code: 3, meaning: "Runtime error".to_string() },
        ],
        grammar: vec!["[]", "[.]", "[!]", "[X]", "()", "(.)", "(!)", "(X)", "{}", "ns:X", ":", "scheme://"],
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    // serde_json::to_string_pretty won't fail on this structure.
    let json = serde_json::to_string_pretty(&info).unwrap_or_default();
    println!("{json}");
}
