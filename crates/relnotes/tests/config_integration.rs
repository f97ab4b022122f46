//! Configuration integration tests.
//!
//! These tests verify config discovery, format parsing, and precedence
//! end-to-end by observing how `relnotes notes` output changes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CHANGELOG: &str = "\
Release 1.4.0
-------------

 * Fixed GH-77.
";

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

fn project_with_changelog() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("CHANGELOG"), CHANGELOG).unwrap();
    tmp
}

fn notes_in(dir: &Path) -> assert_cmd::assert::Assert {
    cmd().args(["-C", dir.to_str().unwrap(), "notes"]).assert()
}

// =============================================================================
// Config File Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = project_with_changelog();

    notes_in(tmp.path())
        .success()
        .stdout(predicate::str::starts_with("<ul>"));
}

#[test]
fn discovers_dotfile_config_in_current_dir() {
    let tmp = project_with_changelog();
    fs::write(
        tmp.path().join(".relnotes.toml"),
        "[changelog]\nformat = \"markdown\"\n",
    )
    .unwrap();

    notes_in(tmp.path())
        .success()
        .stdout(predicate::str::starts_with("* Fixed [GH-77]"));
}

#[test]
fn discovers_regular_config_in_current_dir() {
    let tmp = project_with_changelog();
    fs::write(
        tmp.path().join("relnotes.toml"),
        "[changelog]\nformat = \"markdown\"\n",
    )
    .unwrap();

    notes_in(tmp.path())
        .success()
        .stdout(predicate::str::starts_with("* Fixed"));
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = project_with_changelog();
    let sub_dir = tmp.path().join("nested").join("deep");
    fs::create_dir_all(&sub_dir).unwrap();

    fs::write(
        tmp.path().join(".relnotes.toml"),
        "[changelog]\npath = \"../../CHANGELOG\"\n",
    )
    .unwrap();

    notes_in(&sub_dir)
        .success()
        .stdout(predicate::str::contains(">GH-77</a>"));
}

#[test]
fn dotfile_takes_precedence_over_regular_name() {
    let tmp = project_with_changelog();
    fs::write(
        tmp.path().join(".relnotes.toml"),
        "[changelog]\nformat = \"markdown\"\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("relnotes.toml"),
        "[changelog]\nformat = \"html\"\n",
    )
    .unwrap();

    notes_in(tmp.path())
        .success()
        .stdout(predicate::str::starts_with("* Fixed"));
}

// =============================================================================
// Config Format Parsing
// =============================================================================

#[test]
fn parses_yaml_config() {
    let tmp = project_with_changelog();
    fs::write(
        tmp.path().join(".relnotes.yaml"),
        "changelog:\n  issue_url: https://tracker.test/issues\n",
    )
    .unwrap();

    notes_in(tmp.path())
        .success()
        .stdout(predicate::str::contains(r#"href="https://tracker.test/issues/77""#));
}

#[test]
fn parses_json_config() {
    let tmp = project_with_changelog();
    fs::write(
        tmp.path().join(".relnotes.json"),
        r#"{"changelog": {"format": "markdown", "issue_url": "https://j.test/"}}"#,
    )
    .unwrap();

    notes_in(tmp.path())
        .success()
        .stdout(predicate::str::contains("[GH-77](https://j.test/77)"));
}

#[test]
fn config_path_points_at_alternate_changelog() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("NEWS"), CHANGELOG).unwrap();
    fs::write(
        tmp.path().join(".relnotes.toml"),
        "[changelog]\npath = \"NEWS\"\n",
    )
    .unwrap();

    notes_in(tmp.path()).success();
}

// =============================================================================
// Config Precedence
// =============================================================================

#[test]
fn closer_config_takes_precedence() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("project");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(sub_dir.join("CHANGELOG"), CHANGELOG).unwrap();

    fs::write(
        tmp.path().join(".relnotes.toml"),
        "[changelog]\nformat = \"html\"\n",
    )
    .unwrap();
    fs::write(
        sub_dir.join(".relnotes.toml"),
        "[changelog]\nformat = \"markdown\"\n",
    )
    .unwrap();

    notes_in(&sub_dir)
        .success()
        .stdout(predicate::str::starts_with("* Fixed"));
}

#[test]
fn cli_flags_override_config() {
    let tmp = project_with_changelog();
    fs::write(
        tmp.path().join(".relnotes.toml"),
        "[changelog]\nformat = \"markdown\"\nissue_url = \"https://cfg.test/\"\n",
    )
    .unwrap();

    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "notes",
            "--format",
            "html",
            "--issue-url",
            "https://flag.test/",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<a href="https://flag.test/77">GH-77</a>"#));
}

#[test]
fn explicit_config_flag_overrides_discovered_config() {
    let tmp = project_with_changelog();
    fs::write(
        tmp.path().join(".relnotes.toml"),
        "[changelog]\nformat = \"html\"\n",
    )
    .unwrap();
    let explicit = tmp.path().join("override.toml");
    fs::write(&explicit, "[changelog]\nformat = \"markdown\"\n").unwrap();

    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "--config",
            explicit.to_str().unwrap(),
            "notes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("* Fixed"));
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = project_with_changelog();
    fs::write(tmp.path().join(".relnotes.toml"), "this is not valid toml [[[").unwrap();

    notes_in(tmp.path())
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn invalid_json_config_shows_error() {
    let tmp = project_with_changelog();
    fs::write(tmp.path().join(".relnotes.json"), "{not valid json}").unwrap();

    notes_in(tmp.path()).failure();
}

#[test]
fn unknown_format_in_config_shows_error() {
    let tmp = project_with_changelog();
    fs::write(
        tmp.path().join(".relnotes.toml"),
        "[changelog]\nformat = \"pdf\"\n",
    )
    .unwrap();

    notes_in(tmp.path())
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn attribute_breaking_issue_url_in_config_is_rejected() {
    let tmp = project_with_changelog();
    fs::write(
        tmp.path().join(".relnotes.toml"),
        "[changelog]\nissue_url = 'x\" onclick=\"alert(1)'\n",
    )
    .unwrap();

    notes_in(tmp.path())
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid issue tracker URL"));
}

#[test]
fn issue_url_flag_with_whitespace_is_rejected() {
    let tmp = project_with_changelog();

    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "notes",
            "--issue-url",
            "https://t.test/ onmouseover=x",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid issue tracker URL"));
}

#[test]
fn unknown_config_field_is_ignored() {
    let tmp = project_with_changelog();
    fs::write(
        tmp.path().join(".relnotes.toml"),
        r#"
log_level = "info"
unknown_field = "should be ignored"
another_unknown = 42
"#,
    )
    .unwrap();

    notes_in(tmp.path()).success();
}

// =============================================================================
// Boundary Marker Tests
// =============================================================================

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();
    let parent = tmp.path().join("parent");
    let repo = parent.join("repo");
    fs::create_dir_all(&repo).unwrap();
    fs::write(repo.join("CHANGELOG"), CHANGELOG).unwrap();

    // Config beyond the .git boundary must not be picked up
    fs::write(
        parent.join(".relnotes.toml"),
        "[changelog]\nformat = \"markdown\"\n",
    )
    .unwrap();
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(
        repo.join(".relnotes.toml"),
        "[changelog]\npath = \"../CHANGELOG\"\n",
    )
    .unwrap();

    notes_in(&src)
        .success()
        .stdout(predicate::str::starts_with("<ul>"));
}
