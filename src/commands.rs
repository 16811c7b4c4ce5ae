//! Core CLI commands for colonlink: resolve, links, check, render, info.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;

use crate::config::Config;
use crate::encapsulation::{Rule, matching_rule};
use crate::error;
use crate::resolver::{Resolver, expand_target};
use crate::rewrite::rewrite_links;
use crate::scanner;
use crate::types::{LinkOccurrence, LinkRequest, OutputMode, Resolution};
use crate::workspace::WorkspaceFolders;

/// Everything a command needs: the root, its config, and the workspace
/// folders derived from it.
pub struct Project {
    /// Loaded `.colonlink.toml` (or defaults).
    pub config: Config,
    /// Absolute project root (the working directory).
    pub root: PathBuf,
    /// Workspace folders for root lookup.
    pub workspaces: WorkspaceFolders,
}

impl Project {
    /// Load the project rooted at the current directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the working directory is unavailable, or
    /// config loading errors.
    pub fn load() -> Result<Self, error::Error> {
        let root = std::env::current_dir()?;
        return Self::load_at(root);
    }

    /// Load the project rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns config loading errors.
    pub fn load_at(root: PathBuf) -> Result<Self, error::Error> {
        let config = Config::load(&root)?;
        let workspaces = config.workspace_folders(&root);
        return Ok(Self {
            config,
            root,
            workspaces,
        });
    }

    /// Path shown to the user: relative to the root when possible.
    pub fn display_path(&self, path: &Path) -> String {
        return path.strip_prefix(&self.root).unwrap_or(path).display().to_string();
    }

    /// Resolver borrowing this project's configuration.
    pub fn resolver(&self) -> Resolver<'_> {
        return Resolver {
            namespaces: &self.config.namespaces,
            options: &self.config.options,
            workspaces: &self.workspaces,
        };
    }
}

/// Result of checking one link against the filesystem.
pub enum LinkStatus {
    /// Protocol link; not checked.
    External,
    /// Resolved location exists.
    Found,
    /// Resolved location does not exist.
    Missing(PathBuf),
    /// The link could not be anchored.
    Unresolved,
}

/// JSON form of one resolved link.
#[derive(Serialize)]
struct LinkJson {
    /// Target after expansion and substitution, before path resolution.
    canonical: String,
    /// One-based byte column, when the link came from a file.
    column: Option<u32>,
    /// `display`, `external`, `location`, or `unresolved`.
    kind: &'static str,
    /// Label text.
    label: String,
    /// One-based line, when the link came from a file.
    line: Option<u32>,
    /// Resolution text.
    resolved: String,
    /// Encapsulation rule that claimed the target, if any.
    rule: Option<&'static str>,
    /// Source document as shown to the user.
    source: String,
    /// Shorthand as written.
    target: String,
    /// Hover text.
    tooltip: String,
}

/// Resolve every link under the root and test it for existence on disk.
/// Exit code 0 when every link resolves to an existing file, 2 otherwise.
///
/// # Errors
///
/// Returns errors from config loading or scanning.
pub fn check() -> Result<ExitCode, error::Error> {
    let project = Project::load()?;
    return check_project(&project);
}

/// [`check`] against an already loaded project.
///
/// # Errors
///
/// Returns errors from scanning.
pub fn check_project(project: &Project) -> Result<ExitCode, error::Error> {
    let links = scanner::scan(&project.root, &project.config)?;
    let mut broken_count = 0_u32;

    for link in &links {
        let location = format!("{}:{}", project.display_path(&link.source), link.line);
        match check_link(project, link) {
            LinkStatus::External | LinkStatus::Found => {},
            LinkStatus::Missing(path) => {
                broken_count = broken_count.saturating_add(1);
                println!(
                    "MISSING     {location}  [{}]({}) -> {}",
                    link.display_text,
                    link.raw_target,
                    project.display_path(&path)
                );
            },
            LinkStatus::Unresolved => {
                broken_count = broken_count.saturating_add(1);
                println!("UNRESOLVED  {location}  [{}]({})", link.display_text, link.raw_target);
            },
        }
    }

    if broken_count > 0 {
        println!();
        println!("{broken_count} broken");
        return Ok(ExitCode::from(2));
    }
    let total = links.len();
    println!("All {total} links resolve");
    return Ok(ExitCode::SUCCESS);
}

/// Resolve one link to an absolute location and test it on disk.
pub fn check_link(project: &Project, link: &LinkOccurrence) -> LinkStatus {
    return match project.resolver().resolve(&link.request(OutputMode::ABSOLUTE)) {
        Resolution::Display(text) => existence(PathBuf::from(text)),
        Resolution::External(_) => LinkStatus::External,
        Resolution::Location(path) => existence(path),
        Resolution::Unresolved => LinkStatus::Unresolved,
    };
}

/// Classify a resolved location by whether it exists.
fn existence(path: PathBuf) -> LinkStatus {
    if path.exists() {
        return LinkStatus::Found;
    }
    return LinkStatus::Missing(path);
}

/// Output a reference card for colonlink.
pub fn info(json: bool) {
    return crate::info::run(json);
}

/// Build the JSON record for one link.
fn link_json(project: &Project, link: &LinkOccurrence, resolution: &Resolution, positioned: bool) -> LinkJson {
    let resolver = project.resolver();
    let kind = match resolution {
        Resolution::Display(_) => "display",
        Resolution::External(_) => "external",
        Resolution::Location(_) => "location",
        Resolution::Unresolved => "unresolved",
    };
    return LinkJson {
        canonical: expand_target(
            link.raw_target.trim(),
            &link.display_text,
            resolver.namespaces,
            resolver.options,
        ),
        column: positioned.then_some(link.column),
        kind,
        label: link.display_text.clone(),
        line: positioned.then_some(link.line),
        resolved: resolution.as_text(),
        rule: matching_rule(link.raw_target.trim()).map(Rule::name),
        source: project.display_path(&link.source),
        target: link.raw_target.clone(),
        tooltip: resolution.tooltip(),
    };
}

/// List every link with its document-relative resolution. Scans the named
/// documents, or the whole tree when none are given.
///
/// # Errors
///
/// Returns errors from config loading or scanning.
pub fn links(documents: &[String], json: bool) -> Result<(), error::Error> {
    let project = Project::load()?;
    let links = if documents.is_empty() {
        scanner::scan(&project.root, &project.config)?
    } else {
        let mut found = Vec::new();
        for document in documents {
            found.extend(scanner::scan_document(&project.root.join(document))?);
        }
        found
    };
    let resolver = project.resolver();

    let mut records = Vec::new();
    for link in &links {
        let resolution = resolver.resolve(&link.request(OutputMode::DOCUMENT_RELATIVE));
        crate::debug!("links"; "{}:{} {:?} -> {resolution:?}", link.source.display(), link.line, link.raw_target);
        if json {
            records.push(link_json(&project, link, &resolution, true));
        } else {
            println!(
                "{}:{}:{}  [{}]({}) -> {}  ({})",
                project.display_path(&link.source),
                link.line,
                link.column,
                link.display_text,
                link.raw_target,
                resolution.as_text(),
                resolution.tooltip(),
            );
        }
    }

    if json {
        print_json(&records);
    }
    return Ok(());
}

/// Pretty-print a serializable value.
fn print_json<T: Serialize>(value: &T) {
    // serde_json::to_string_pretty won't fail on these structures.
    let json = serde_json::to_string_pretty(value).unwrap_or_default();
    println!("{json}");
    return;
}

/// Print a markdown document with every link target rewritten to its
/// site-rooted resolution.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the document is missing, or config
/// loading errors.
pub fn render(document: &str) -> Result<(), error::Error> {
    let project = Project::load()?;
    let path = project.root.join(document);
    let content = std::fs::read_to_string(&path).map_err(|_err| return error::Error::FileNotFound { path: path.clone() })?;
    print!("{}", rewrite_links(&content, &path, &project.resolver()));
    return Ok(());
}

/// Arguments of the `resolve` command.
pub struct ResolveArgs<'a> {
    /// Return the absolute location.
    pub absolute: bool,
    /// Document containing the link, relative to the root.
    pub document: &'a str,
    /// Emit JSON.
    pub json: bool,
    /// Shorthand target. Empty when omitted.
    pub target: &'a str,
    /// Label text.
    pub text: &'a str,
    /// Format relative to the workspace root.
    pub workspace_relative: bool,
}

/// Resolve a single shorthand target as if it appeared in `document`.
/// The document does not need to exist.
///
/// # Errors
///
/// Returns config loading errors.
pub fn resolve(args: &ResolveArgs<'_>) -> Result<(), error::Error> {
    let project = Project::load()?;
    let source = project.root.join(args.document);
    let mode = OutputMode {
        as_absolute_location: args.absolute,
        relative_to_workspace_root: args.workspace_relative,
    };
    let request = LinkRequest::new(args.target, args.text, &source, mode);
    let resolution = project.resolver().resolve(&request);

    if args.json {
        let link = LinkOccurrence {
            column: 0,
            display_text: args.text.to_string(),
            line: 0,
            raw_target: args.target.to_string(),
            source,
        };
        print_json(&link_json(&project, &link, &resolution, false));
    } else {
        println!("{}", resolution.as_text());
    }
    return Ok(());
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn check_link_reports_missing_and_found() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        std::fs::create_dir_all(root.join("docs/src/cavalion-blocks")).unwrap();
        std::fs::write(root.join("docs/src/cavalion-blocks/intro"), "").unwrap();
        let project = Project::load_at(root.clone()).unwrap();

        let found = LinkOccurrence {
            column: 1,
            display_text: "intro".to_string(),
            line: 1,
            raw_target: "[]".to_string(),
            source: root.join("docs/page.md"),
        };
        assert!(matches!(check_link(&project, &found), LinkStatus::Found));

        let missing = LinkOccurrence {
            raw_target: "(Button)".to_string(),
            ..found.clone()
        };
        let LinkStatus::Missing(path) = check_link(&project, &missing) else {
            panic!("expected missing");
        };
        assert_eq!(path, root.join("docs/src/vcl-comps/Button"));

        let external = LinkOccurrence {
            raw_target: "https://example.com".to_string(),
            ..found
        };
        assert!(matches!(check_link(&project, &external), LinkStatus::External));
    }

    #[test]
    fn display_path_strips_root() {
        let project = Project::load_at(PathBuf::from("/nonexistent-root")).unwrap();
        assert_eq!(project.display_path(Path::new("/nonexistent-root/docs/a.md")), "docs/a.md");
        assert_eq!(project.display_path(Path::new("/elsewhere/a.md")), "/elsewhere/a.md");
    }
}
