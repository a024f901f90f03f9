use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_apidoc-ts")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

/// Lines of stderr carrying a warning.
fn warnings(stderr: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stderr)
        .lines()
        .filter(|l| l.contains("WARN"))
        .map(String::from)
        .collect()
}

// -- stdin mode --

#[test]
fn stdin_mode_expands_array_roots() {
    let assert = cmd()
        .arg("--stdin-path")
        .arg(fixture_path("arrays.ts"))
        .write_stdin(read_fixture("arrays.ts"))
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    let brackets = "@api {get} /api/:id\n\
                    @apiParam {SquareConfig} id Unique ID.\n\
                    @apiSuccess {Object[]} squareConfigs\n\
                    @apiSuccess {String} squareConfigs.color `squareConfigs.color`\n\
                    @apiSuccess {Number} squareConfigs.width `squareConfigs.width`\n\
                    @apiGroup arrayWithBracketsTest\n";
    assert!(output.starts_with(brackets), "unexpected output:\n{output}");
    assert_eq!(output.matches("@apiSuccess {Object[]} squareConfigs\n").count(), 2);
    assert!(output.contains("@apiSuccess {Object[]} apiSuccess\n@apiSuccess {String} apiSuccess.color"));
}

#[test]
fn stdin_mode_param_tags() {
    cmd()
        .write_stdin(read_fixture("arrays.ts"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "@apiParam {String} square.color `square.color`\n\
             @apiParam {Number} square.width `square.width`\n\
             @apiParam {String[]} tags Labels to attach.\n\
             @apiGroup paramTest\n",
        ));
}

#[test]
fn stdin_mode_enums() {
    cmd()
        .write_stdin(read_fixture("enums.ts"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "@apiSuccess {Object[]} squares `squares`\n\
             @apiSuccess {Enum} squares.color `squares.color`\n\
             @apiSuccess {Number} squares.width `squares.width`\n",
        ))
        .stdout(predicate::str::contains("@apiSuccess {Enum} color `color`\n"));
}

#[test]
fn stdin_mode_plain_comments_produce_nothing() {
    cmd()
        .write_stdin(read_fixture("plain.ts"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// -- file mode --

#[test]
fn file_mode_test1() {
    let dir = TempDir::new().unwrap();

    let assert = cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("test1/index.ts"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("index.txt")).unwrap();
    assert_eq!(output, read_fixture("test1.expected.txt"));

    let warned = warnings(&assert.get_output().stderr);
    assert_eq!(warned.len(), 1, "warnings: {warned:?}");
    assert!(warned[0].contains("could not find interface «X»"));
}

#[test]
fn file_mode_namespaces() {
    let dir = TempDir::new().unwrap();

    let assert = cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("namespaces.ts"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("namespaces.txt")).unwrap();
    assert!(output.contains("@apiSuccess {String} namespaced.id `namespaced.id`\n"));
    assert!(output.contains("@api {get} /api/:id\n@apiGroup Missing namespace\n"));

    let warned = warnings(&assert.get_output().stderr);
    assert_eq!(warned.len(), 1, "warnings: {warned:?}");
    assert!(warned[0].contains("«Missing»"));
}

#[test]
fn file_mode_json() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "-f", "json"])
        .arg(fixture_path("enums.ts"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("enums.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&output).unwrap();
    let blocks = doc["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 2);

    let element = &blocks[1]["elements"][2];
    assert_eq!(element["name"], "apisuccess");
    assert_eq!(element["sourceName"], "apiSuccess");
    assert_eq!(element["content"], "{Enum} color `color`\n");
    assert_eq!(element["source"], "@apiSuccess {Enum} color `color`\n");
}

#[test]
fn file_mode_markdown() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "-f", "markdown"])
        .arg(fixture_path("arrays.ts"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("arrays.md")).unwrap();
    assert!(output.contains("## {post} /api/squares"));
    assert!(output.contains("| square.color | String | `square.color` |"));
    assert!(output.contains("| tags | String[] | Labels to attach. |"));
}

#[test]
fn file_mode_glob_and_directory() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("test1"))
        .arg(fixture_path("enu*.ts"))
        .assert()
        .success();

    assert!(dir.path().join("index.txt").exists());
    assert!(dir.path().join("enums.txt").exists());
    // Declaration-only files have no api blocks
    assert!(!dir.path().join("interfaces.txt").exists());
    assert!(!dir.path().join("company.txt").exists());
}

#[test]
fn file_mode_skips_files_without_api_blocks() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("plain.ts"))
        .assert()
        .success();

    assert!(!dir.path().join("plain.txt").exists());
}

#[test]
fn file_mode_requires_output() {
    cmd()
        .arg(fixture_path("arrays.ts"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn unknown_format_fails() {
    cmd()
        .args(["-f", "yaml"])
        .write_stdin(read_fixture("arrays.ts"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn unsupported_file_is_skipped_with_warning() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.md");
    std::fs::write(&notes, "/** @api {get} /x */").unwrap();

    cmd()
        .args(["-o", dir.path().join("out").to_str().unwrap()])
        .arg(&notes)
        .arg(fixture_path("enums.ts"))
        .assert()
        .success()
        .stderr(predicate::str::contains("unsupported file type"));

    assert!(dir.path().join("out/enums.txt").exists());
}

// -- options --

#[test]
fn raw_label_style() {
    cmd()
        .args(["--label-style", "raw"])
        .write_stdin(read_fixture("arrays.ts"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "@apiSuccess {string} squareConfigs.color",
        ))
        .stdout(predicate::str::contains("@apiParam {string[]} tags"));
}

#[test]
fn diamond_deduplicated_by_default() {
    let assert = cmd()
        .write_stdin(read_fixture("diamond.ts"))
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output.matches("both.id `both.id`").count(), 1);
}

#[test]
fn keep_duplicates() {
    let assert = cmd()
        .arg("--keep-duplicates")
        .write_stdin(read_fixture("diamond.ts"))
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output.matches("both.id `both.id`").count(), 2);
}

#[test]
fn ambient_declarations_are_not_documented() {
    let dir = TempDir::new().unwrap();
    let lib = dir.path().join("lib.d.ts");
    std::fs::write(&lib, "interface Stamp { iso: string }").unwrap();
    let src = "interface Event { name: string; at: Stamp }\n\
               /**\n * @api {get} /events\n * @apiInterfaceSuccess {Event} event\n */\n";

    let assert = cmd()
        .arg("--ambient")
        .arg(&lib)
        .write_stdin(src)
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.contains("@apiSuccess {Object} event.at `event.at`\n"));
    assert!(!output.contains("event.at.iso"));
}

#[test]
fn missing_ambient_file_fails() {
    cmd()
        .args(["--ambient", "/no/such/lib.d.ts"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load ambient declarations"));
}
