//! Error Handling and Edge Case Tests

use std::fs;

use crate::common::{assert_contains, assert_json_array, TestRepo};

// ============================================================================
// EMPTY FILE TESTS
// ============================================================================

#[test]
fn test_empty_file_produces_empty_arrays() {
    let repo = TestRepo::new();
    repo.add_empty_file("empty.c");

    let stdout = repo.run_cli_success(&["empty.c"]);

    for artifact in ["macros.json", "types.json", "apis.json"] {
        assert_eq!(repo.read_output(artifact), "[]\n", "{}", artifact);
    }
    assert_contains(&stdout, "macros : file~=0    json=0    ok");
    assert_contains(&stdout, "types  : file~=0    json=0    ok");
    assert_contains(&stdout, "apis   : file~=0    json=0    ok");
}

#[test]
fn test_whitespace_and_comments_only() {
    let repo = TestRepo::new();
    repo.add_file("blank.c", "\n\n   \t\n/* nothing here */\n// #define NOT_REAL 1\n");

    repo.run_cli_success(&["blank.c"]);
    assert!(assert_json_array(&repo.read_output("macros.json"), "macros").is_empty());
}

// ============================================================================
// FATAL ERRORS
// ============================================================================

#[test]
fn test_missing_input_file() {
    let repo = TestRepo::new();
    let (code, stderr) = repo.run_cli_failure(&["does_not_exist.c"]);

    assert_eq!(code, Some(1));
    assert_contains(&stderr, "does_not_exist.c");
    assert!(!repo.output_path("macros.json").exists());
}

#[test]
fn test_non_utf8_input() {
    let repo = TestRepo::new();
    fs::write(repo.path().join("bad.c"), [0xff, 0xfe, 0x00, 0x41]).unwrap();

    let (code, stderr) = repo.run_cli_failure(&["bad.c"]);
    assert_eq!(code, Some(1));
    assert_contains(&stderr, "bad.c");
}

#[test]
fn test_unwritable_output_directory() {
    let repo = TestRepo::new();
    repo.add_file("a.c", "#define A 1\n");
    repo.add_file("blocker", "a file, not a directory");

    let (code, stderr) = repo.run_cli_failure(&["a.c", "--output-dir", "blocker/out"]);
    assert_eq!(code, Some(3));
    assert_contains(&stderr, "blocker");
}

#[test]
fn test_missing_argument_is_usage_error() {
    let repo = TestRepo::new();
    let (code, _) = repo.run_cli_failure(&[]);
    assert_eq!(code, Some(2));
}

// ============================================================================
// RECOVERY
// ============================================================================

#[test]
fn test_broken_source_still_completes() {
    let repo = TestRepo::new();
    repo.add_file(
        "broken.c",
        "#define OK 1\nint good(void);\nstruct Half { int a;\n}}} ((( garbage\n",
    );

    let stdout = repo.run_cli_success(&["broken.c"]);
    assert_contains(&stdout, "=== Verification ===");

    for artifact in ["macros.json", "types.json", "apis.json"] {
        assert_json_array(&repo.read_output(artifact), artifact);
    }
}

#[test]
fn test_existing_artifacts_are_overwritten() {
    let repo = TestRepo::new();
    repo.add_file("a.c", "#define A 1\n");
    fs::create_dir_all(repo.path().join("outputs")).unwrap();
    fs::write(repo.output_path("macros.json"), "stale").unwrap();

    repo.run_cli_success(&["a.c"]);
    let macros = assert_json_array(&repo.read_output("macros.json"), "macros");
    assert_eq!(macros.len(), 1);
}
