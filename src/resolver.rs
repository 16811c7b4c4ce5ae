//! Shorthand resolution pipeline.
//!
//! A request flows through default-target synthesis (empty targets only),
//! encapsulation expansion, colon substitution, namespace defaults, and
//! finally base-directory resolution and formatting. Every stage is a pure
//! string function; the only outside query is the workspace lookup.

use std::path::{Path, PathBuf};

use crate::encapsulation::{expand, expand_placeholder};
use crate::namespace::{NamespaceTable, apply_namespace_defaults};
use crate::paths::{document_dir, join_target, normalize_path, relative_to};
use crate::placeholder::{has_protocol, substitute_colon};
use crate::types::{LinkRequest, OutputMode, Resolution, ResolveOptions};
use crate::workspace::WorkspaceLookup;

/// Immutable inputs shared by every resolution: the namespace table, the
/// options, and the workspace lookup.
pub struct Resolver<'a> {
    /// Shorthand namespaces and wrapper mapping.
    pub namespaces: &'a NamespaceTable,
    /// Index file and URL placeholder settings.
    pub options: &'a ResolveOptions,
    /// Workspace membership collaborator.
    pub workspaces: &'a dyn WorkspaceLookup,
}

impl Resolver<'_> {
    /// Resolve one request. See [`resolve`].
    pub fn resolve(&self, request: &LinkRequest) -> Resolution {
        return resolve(request, self.namespaces, self.options, self.workspaces);
    }
}

/// Resolve a shorthand link target into a location or display path.
///
/// Protocol links come back as `Resolution::External` after colon
/// substitution. A request without a source document that would need one
/// comes back as `Resolution::Unresolved`. Nothing here touches the disk.
pub fn resolve(
    request: &LinkRequest,
    namespaces: &NamespaceTable,
    options: &ResolveOptions,
    workspaces: &dyn WorkspaceLookup,
) -> Resolution {
    let target = request.raw_target.trim();

    if target.is_empty() {
        let Some(source) = request.source.as_deref() else {
            return Resolution::Unresolved;
        };
        let location = synthesize_default_target(&request.display_text, source, options);
        return format_location(location, source, request.mode, workspaces);
    }

    let canonical = expand_target(target, &request.display_text, namespaces, options);
    if has_protocol(&canonical) {
        return Resolution::External(canonical);
    }

    let Some(source) = request.source.as_deref() else {
        return Resolution::Unresolved;
    };

    let defaulted = apply_namespace_defaults(&canonical, namespaces, options);
    let base = base_dir(&defaulted, source, workspaces);
    let location = join_target(&base, &defaulted);
    return format_location(location, source, request.mode, workspaces);
}

/// Run the string stages: wrapper expansion, colon substitution, and
/// placeholder re-expansion.
pub fn expand_target(
    target: &str,
    display_text: &str,
    namespaces: &NamespaceTable,
    options: &ResolveOptions,
) -> String {
    let expanded = expand(target, namespaces);
    let substituted = substitute_colon(&expanded, display_text, namespaces, options);
    return expand_placeholder(&expanded, &substituted, namespaces);
}

/// Target for a link written with nothing between the parentheses: the
/// label joined onto the document's directory. A label ending in `/`
/// names a directory, so its index file is appended.
pub fn synthesize_default_target(display_text: &str, source: &Path, options: &ResolveOptions) -> PathBuf {
    let label = display_text.trim();
    let mut location = join_target(&source_dir(source), label);
    if label.ends_with('/') {
        location.push(&options.index_file);
    }
    return location;
}

/// Directory a fully expanded target is resolved against. Targets starting
/// with `/` are rooted at the document's workspace, falling back to the
/// document's own directory when it belongs to no workspace.
pub fn base_dir(target: &str, source: &Path, workspaces: &dyn WorkspaceLookup) -> PathBuf {
    if !target.starts_with('/') {
        return source_dir(source);
    }
    return workspaces
        .workspace_root(source)
        .unwrap_or_else(|| return source_dir(source));
}

/// Shape an absolute location into what the caller asked for.
fn format_location(
    location: PathBuf,
    source: &Path,
    mode: OutputMode,
    workspaces: &dyn WorkspaceLookup,
) -> Resolution {
    if mode.as_absolute_location {
        return Resolution::Location(location);
    }

    let anchor = if mode.relative_to_workspace_root {
        workspaces.workspace_root(source)
    } else {
        Some(source_dir(source))
    };

    let display = anchor
        .and_then(|a| return relative_to(&location, &a))
        .unwrap_or_else(|| return location.display().to_string());
    return Resolution::Display(display);
}

/// Normalized directory of the source document.
fn source_dir(source: &Path) -> PathBuf {
    return normalize_path(&document_dir(source));
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;
    use crate::workspace::WorkspaceFolders;

    const DOC: &str = "/ws/docs/page.md";

    fn run(target: &str, label: &str, mode: OutputMode) -> Resolution {
        let request = LinkRequest::new(target, label, Path::new(DOC), mode);
        let folders = WorkspaceFolders::new(["/ws"]);
        return resolve(&request, &NamespaceTable::default(), &ResolveOptions::default(), &folders);
    }

    fn location(target: &str, label: &str) -> PathBuf {
        let Resolution::Location(path) = run(target, label, OutputMode::ABSOLUTE) else {
            panic!("expected a location for {target:?}");
        };
        return path;
    }

    #[test]
    fn empty_brackets_resolve_into_blocks_root() {
        assert_eq!(location("[]", "intro"), PathBuf::from("/ws/docs/src/cavalion-blocks/intro"));
    }

    #[test]
    fn empty_target_uses_label_as_path() {
        assert_eq!(location("", "notes/"), PathBuf::from("/ws/docs/notes/index.md"));
        assert_eq!(location("  ", " guide.md "), PathBuf::from("/ws/docs/guide.md"));
    }

    #[test]
    fn self_directory_sentinel_puts_label_beside_document() {
        assert_eq!(location("[.]", "intro"), PathBuf::from("/ws/docs/intro"));
        assert_eq!(location("(.)", "Button"), PathBuf::from("/ws/docs/Button"));
    }

    #[test]
    fn bang_sentinel_prefixes_label() {
        assert_eq!(location("[!]", "intro"), PathBuf::from("/ws/docs/src/cavalion-blocks/!intro"));
    }

    #[test]
    fn namespace_payload_ignores_label() {
        assert_eq!(location("blocks:note", "ignored"), PathBuf::from("/ws/docs/src/cavalion-blocks/note"));
        assert_eq!(location("blocks:", "intro"), PathBuf::from("/ws/docs/src/cavalion-blocks/intro"));
    }

    #[test]
    fn rooted_target_resolves_against_workspace() {
        assert_eq!(location("/img/logo.png", "logo"), PathBuf::from("/ws/img/logo.png"));
        assert_eq!(location("blocks:/shared/x", "x"), PathBuf::from("/ws/shared/x"));
    }

    #[test]
    fn rooted_target_without_workspace_uses_document_dir() {
        let request = LinkRequest::new("/img/logo.png", "logo", Path::new(DOC), OutputMode::ABSOLUTE);
        let resolved = resolve(&request, &NamespaceTable::default(), &ResolveOptions::default(), &WorkspaceFolders::default());
        assert_eq!(resolved, Resolution::Location(PathBuf::from("/ws/docs/img/logo.png")));
    }

    #[test]
    fn workspace_relative_without_workspace_is_absolute() {
        let request = LinkRequest::new("[]", "intro", Path::new(DOC), OutputMode::WORKSPACE_RELATIVE);
        let resolved = resolve(&request, &NamespaceTable::default(), &ResolveOptions::default(), &WorkspaceFolders::default());
        assert_eq!(resolved, Resolution::Display("/ws/docs/src/cavalion-blocks/intro".to_string()));
    }

    #[test]
    fn empty_braces_put_braced_label_beside_document() {
        assert_eq!(location("{}", "intro"), PathBuf::from("/ws/docs/{intro}"));
        assert_eq!(run("{}", "intro", OutputMode::DOCUMENT_RELATIVE), Resolution::Display("{intro}".to_string()));
    }

    #[test]
    fn unrecognized_target_is_plain_join() {
        assert_eq!(location("sub/../other.md", "x"), PathBuf::from("/ws/docs/other.md"));
    }

    #[test]
    fn protocol_links_pass_through() {
        let resolved = run("https://example.com/:", "page", OutputMode::ABSOLUTE);
        assert_eq!(resolved, Resolution::External("https://example.com/page".to_string()));
        let untouched = run("https://example.com/a", "page", OutputMode::DOCUMENT_RELATIVE);
        assert_eq!(untouched, Resolution::External("https://example.com/a".to_string()));
    }

    #[test]
    fn missing_source_is_unresolved() {
        let request = LinkRequest {
            display_text: "intro".to_string(),
            mode: OutputMode::ABSOLUTE,
            raw_target: "[]".to_string(),
            source: None,
        };
        let resolved = resolve(&request, &NamespaceTable::default(), &ResolveOptions::default(), &WorkspaceFolders::default());
        assert_eq!(resolved, Resolution::Unresolved);
    }

    #[test]
    fn document_relative_display() {
        let resolved = run("[]", "intro", OutputMode::DOCUMENT_RELATIVE);
        assert_eq!(resolved, Resolution::Display("src/cavalion-blocks/intro".to_string()));
    }

    #[test]
    fn workspace_relative_display() {
        let resolved = run("[]", "intro", OutputMode::WORKSPACE_RELATIVE);
        assert_eq!(resolved, Resolution::Display("docs/src/cavalion-blocks/intro".to_string()));
    }

    #[test]
    fn display_falls_back_to_absolute_outside_anchor() {
        let resolved = run("../../outside.md", "x", OutputMode::WORKSPACE_RELATIVE);
        assert_eq!(resolved, Resolution::Display("/outside.md".to_string()));
        let beside = run("../readme.md", "x", OutputMode::DOCUMENT_RELATIVE);
        assert_eq!(beside, Resolution::Display("/ws/readme.md".to_string()));
    }

    #[test]
    fn relative_display_round_trips_onto_document_dir() {
        for target in ["[]", "[.]", "blocks:a/b", "", "x/../y.md", "../up.md"] {
            let absolute = location(target, "intro/");
            let Resolution::Display(display) = run(target, "intro/", OutputMode::DOCUMENT_RELATIVE) else {
                panic!("expected display for {target:?}");
            };
            let rejoined = normalize_path(&Path::new("/ws/docs").join(display));
            assert_eq!(rejoined, absolute, "round trip for {target:?}");
        }
    }

    #[test]
    fn resolution_is_repeatable() {
        let first = run("(x)", "y", OutputMode::DOCUMENT_RELATIVE);
        let second = run("(x)", "y", OutputMode::DOCUMENT_RELATIVE);
        assert_eq!(first, second);
    }

    #[test]
    fn resolver_struct_delegates() {
        let folders = WorkspaceFolders::new(["/ws"]);
        let namespaces = NamespaceTable::default();
        let options = ResolveOptions::default();
        let resolver = Resolver {
            namespaces: &namespaces,
            options: &options,
            workspaces: &folders,
        };
        let request = LinkRequest::new("[]", "intro", Path::new(DOC), OutputMode::ABSOLUTE);
        assert_eq!(resolver.resolve(&request), run("[]", "intro", OutputMode::ABSOLUTE));
    }
}
