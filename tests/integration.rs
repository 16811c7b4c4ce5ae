use std::path::Path;
use std::process::Command;

fn colonlink_cmd(fixture: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_colonlink"));
    cmd.current_dir(Path::new("tests/fixtures").join(fixture));
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn check_passes_when_every_link_exists() {
    let output = colonlink_cmd("basic").arg("check").output().unwrap();
    assert!(
        output.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("All 4 links resolve"));
}

#[test]
fn check_reports_missing_targets() {
    let output = colonlink_cmd("broken").arg("check").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("MISSING"), "stdout: {stdout}");
    assert!(stdout.contains("src/cavalion-blocks/missing"), "stdout: {stdout}");
    assert!(stdout.contains("1 broken"), "stdout: {stdout}");
}

#[test]
fn resolve_formats_each_output_mode() {
    let relative = stdout_of(colonlink_cmd("basic").args(["resolve", "docs/guide.md", "[]", "--text", "intro"]));
    assert_eq!(relative.trim(), "src/cavalion-blocks/intro");

    let rooted = stdout_of(colonlink_cmd("basic").args([
        "resolve",
        "docs/guide.md",
        "[]",
        "--text",
        "intro",
        "--workspace-relative",
    ]));
    assert_eq!(rooted.trim(), "docs/src/cavalion-blocks/intro");

    let absolute = stdout_of(colonlink_cmd("basic").args(["resolve", "docs/guide.md", "(Button)", "--absolute"]));
    let absolute = absolute.trim();
    assert!(Path::new(absolute).is_absolute(), "not absolute: {absolute}");
    assert!(absolute.ends_with("docs/src/vcl-comps/Button"), "got: {absolute}");
}

#[test]
fn resolve_empty_target_uses_configured_index_file() {
    let out = stdout_of(colonlink_cmd("broken").args(["resolve", "page.md", "--text", "guide/"]));
    assert_eq!(out.trim(), "guide/README.md");
}

#[test]
fn resolve_json_reports_canonical_form() {
    let out = stdout_of(colonlink_cmd("basic").args(["resolve", "docs/guide.md", "[]", "--text", "intro", "--json"]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["canonical"], "blocks:intro");
    assert_eq!(value["kind"], "display");
    assert_eq!(value["rule"], "empty-placeholder");
    assert_eq!(value["tooltip"], "Open: intro");
}

#[test]
fn links_json_lists_every_occurrence() {
    let out = stdout_of(colonlink_cmd("basic").args(["links", "--json"]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 4);

    let site = records.iter().find(|r| r["label"] == "site").unwrap();
    assert_eq!(site["kind"], "external");
    assert_eq!(site["resolved"], "https://example.com");

    let notes = records.iter().find(|r| r["label"] == "notes/").unwrap();
    assert_eq!(notes["resolved"], "notes/index.md");
    assert_eq!(notes["line"], 4);
}

#[test]
fn links_scans_only_named_documents() {
    let out = stdout_of(colonlink_cmd("basic").args(["links", "docs/notes/index.md", "--json"]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 0);
}

#[test]
fn render_rewrites_targets_to_site_rooted_paths() {
    let out = stdout_of(colonlink_cmd("basic").args(["render", "docs/guide.md"]));
    assert!(out.contains("[intro](/docs/src/cavalion-blocks/intro)"), "out: {out}");
    assert!(out.contains("[Button](/docs/src/vcl-comps/Button)"), "out: {out}");
    assert!(out.contains("[notes/](/docs/notes/index.md)"), "out: {out}");
    assert!(out.contains("[site](https://example.com)"), "out: {out}");
}

#[test]
fn render_missing_document_exits_with_error() {
    let output = colonlink_cmd("basic").args(["render", "docs/nope.md"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn info_json_is_valid() {
    let out = stdout_of(colonlink_cmd("basic").args(["info", "--json"]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(value.is_object());
}

#[test]
fn namespace_add_then_resolve_through_it() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("page.md"), "[setup](docs:setup.md)\n").unwrap();

    let run = |args: &[&str]| {
        let output = Command::new(env!("CARGO_BIN_EXE_colonlink"))
            .current_dir(dir.path())
            .args(args)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    };

    run(&["namespace", "add", "docs", "handbook"]);
    let config = std::fs::read_to_string(dir.path().join(".colonlink.toml")).unwrap();
    assert!(config.contains("docs = \"handbook\""), "config: {config}");

    let out = run(&["resolve", "page.md", "docs:setup.md"]);
    assert_eq!(out.trim(), "handbook/setup.md");

    run(&["namespace", "rename", "docs", "manual"]);
    let page = std::fs::read_to_string(dir.path().join("page.md")).unwrap();
    assert_eq!(page, "[setup](manual:setup.md)\n");
}
