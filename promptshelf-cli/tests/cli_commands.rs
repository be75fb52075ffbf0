use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `shelf` invocation isolated from the user's home and configuration
fn shelf(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env("HOME", home.path())
        .env("PROMPTSHELF_DATA_DIR", home.path().join("data"))
        .env_remove("PROMPTSHELF_INJECTOR")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .current_dir(home.path());
    cmd
}

/// Run a creating command and return the id it printed
fn created_id(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output)
        .unwrap()
        .split_whitespace()
        .last()
        .unwrap()
        .to_string()
}

#[test]
fn test_add_list_and_inject() {
    let home = TempDir::new().unwrap();
    let folder = created_id(shelf(&home).args(["add-folder", "Work"]));
    created_id(shelf(&home).args([
        "add-prompt",
        "Code review",
        "--content",
        "Review this {{lang}} code for {{focus|bugs}}",
        "--parent",
        &folder,
    ]));

    shelf(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Work").and(predicate::str::contains("Code review")));

    shelf(&home)
        .args(["list", "--filter", "nothing like this"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No prompts match"));
}

#[test]
fn test_inject_with_presets_prints_text() {
    let home = TempDir::new().unwrap();
    let id = created_id(shelf(&home).args([
        "add-prompt",
        "Review",
        "--content",
        "Review this {{lang}} code for {{focus|bugs}}",
    ]));

    shelf(&home)
        .args(["inject", &id, "--var", "lang=rust", "--no-input"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Review this rust code for bugs"));

    shelf(&home)
        .args(["history", "list", "lang"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rust"));

    shelf(&home)
        .args(["history", "delete", "lang", "1"])
        .assert()
        .success();
    shelf(&home)
        .args(["history", "list", "lang"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No remembered values"));
}

#[test]
fn test_missing_required_value_is_a_warning() {
    let home = TempDir::new().unwrap();
    let id = created_id(shelf(&home).args(["add-prompt", "Needs", "--content", "{{topic}}"]));

    shelf(&home)
        .args(["inject", &id, "--no-input"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("topic"));
}

#[test]
fn test_move_into_own_subtree_is_refused() {
    let home = TempDir::new().unwrap();
    let outer = created_id(shelf(&home).args(["add-folder", "Outer"]));
    let inner = created_id(shelf(&home).args(["add-folder", "Inner", "--parent", &outer]));

    shelf(&home)
        .args(["move", &outer, &inner, "--position", "inside"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("own subtree"));
}

#[test]
fn test_export_and_import() {
    let home = TempDir::new().unwrap();
    created_id(shelf(&home).args(["add-prompt", "Keep", "--content", "text"]));
    let export = home.path().join("library.json");
    shelf(&home)
        .args(["export", export.to_str().unwrap()])
        .assert()
        .success();

    let other = TempDir::new().unwrap();
    shelf(&other)
        .args(["import", export.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 nodes"));
    shelf(&other)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep"));

    let bad = home.path().join("bad.json");
    std::fs::write(&bad, r#"[{"id": "1", "type": "note", "title": "x"}]"#).unwrap();
    shelf(&other)
        .args(["import", bad.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("forest[0]"));
}
