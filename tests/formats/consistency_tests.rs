//! Output consistency tests
//!
//! Properties that must hold for whichever backend serves a run: stable
//! artifacts, comments derived purely from fields, and agreement between
//! the two extractors on plain inputs.

use cdecl_extract::format::{api_comment, macro_comment, type_comment};
use cdecl_extract::output::to_json;
use cdecl_extract::verify::heuristic_counts;
use cdecl_extract::{
    extract_declarations, verify, Backend, Category, ExtractOptions, Records, TypeKind,
};

use crate::common::{assert_json_array, test_repo::SAMPLE_C, TestRepo};

fn records(source: &str, backend: Backend) -> Records {
    let extraction = extract_declarations(source, backend, ExtractOptions::default())
        .unwrap_or_else(|e| panic!("{} extraction failed: {}", backend, e));
    assert_eq!(extraction.backend, backend);
    Records::from(&extraction.declarations)
}

fn both_backends() -> [Backend; 2] {
    [Backend::TreeSitter, Backend::Regex]
}

// ============================================================================
// BASIC PROPERTIES
// ============================================================================

#[test]
fn test_macro_property() {
    for backend in both_backends() {
        let r = records("#define FOO 42\n", backend);
        assert_eq!(r.macros.len(), 1, "{}", backend);
        assert_eq!(r.macros[0].name, "FOO");
        assert_eq!(r.macros[0].value, "42");
        assert_eq!(r.macros[0].comment, "macro defined with name FOO and value 42");
    }
}

#[test]
fn test_struct_property() {
    for backend in both_backends() {
        let r = records("struct Point { int x; int y; };\n", backend);
        assert_eq!(r.types.len(), 1, "{}", backend);
        assert_eq!(r.types[0].name, "Point");
        assert_eq!(r.types[0].kind, TypeKind::Struct);
        assert_eq!(r.types[0].member_count, 2);
    }
}

#[test]
fn test_prototype_property() {
    for backend in both_backends() {
        let r = records("int add(int a, int b);\n", backend);
        assert_eq!(r.apis.len(), 1, "{}", backend);
        assert_eq!(r.apis[0].name, "add");
        assert_eq!(r.apis[0].param_count, 2);
        assert_eq!(r.apis[0].return_type, "int");
    }
}

#[test]
fn test_empty_input_property() {
    for backend in both_backends() {
        let r = records("", backend);
        assert!(r.macros.is_empty() && r.types.is_empty() && r.apis.is_empty());

        let report = verify("", &r);
        assert!(report.all_match());
        assert!(report
            .checks
            .iter()
            .all(|c| c.heuristic_count == 0 && c.actual_count == 0));
    }
}

// ============================================================================
// DETERMINISM
// ============================================================================

#[test]
fn test_artifacts_are_idempotent() {
    let repo = TestRepo::new();
    repo.with_sample();

    repo.run_cli_success(&["sample.c"]);
    let first: Vec<String> = ["macros.json", "types.json", "apis.json"]
        .iter()
        .map(|a| repo.read_output(a))
        .collect();

    repo.run_cli_success(&["sample.c"]);
    let second: Vec<String> = ["macros.json", "types.json", "apis.json"]
        .iter()
        .map(|a| repo.read_output(a))
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_comments_regenerate_from_fields() {
    let repo = TestRepo::new();
    repo.with_sample();
    repo.run_cli_success(&["sample.c"]);

    for m in assert_json_array(&repo.read_output("macros.json"), "macros") {
        let expected = macro_comment(m["name"].as_str().unwrap(), m["value"].as_str().unwrap());
        assert_eq!(m["comment"], expected.as_str());
    }
    for t in assert_json_array(&repo.read_output("types.json"), "types") {
        let expected = type_comment(
            t["name"].as_str().unwrap(),
            t["member_count"].as_u64().unwrap() as usize,
        );
        assert_eq!(t["comment"], expected.as_str());
    }
    for a in assert_json_array(&repo.read_output("apis.json"), "apis") {
        let expected = api_comment(
            a["name"].as_str().unwrap(),
            a["param_count"].as_u64().unwrap() as usize,
            a["return_type"].as_str().unwrap(),
        );
        assert_eq!(a["comment"], expected.as_str());
    }
}

#[test]
fn test_to_json_matches_written_artifact() {
    let repo = TestRepo::new();
    repo.with_sample();
    repo.run_cli_success(&["sample.c"]);

    let r = records(SAMPLE_C, Backend::TreeSitter);
    assert_eq!(to_json(&r.apis).unwrap(), repo.read_output("apis.json"));
}

// ============================================================================
// BACKEND AGREEMENT
// ============================================================================

#[test]
fn test_backends_agree_on_sample() {
    assert_eq!(
        records(SAMPLE_C, Backend::TreeSitter),
        records(SAMPLE_C, Backend::Regex)
    );
}

#[test]
fn test_backends_agree_with_comments_and_guards() {
    let src = r#"
#ifndef CONFIG_H
#define CONFIG_H

/* int commented_out(void); */
// #define HIDDEN 1

typedef enum Mode { MODE_A = 1, MODE_B = 2 } Mode;

struct Buffer {
    unsigned char *data;
    unsigned long len, cap;
};

const char *mode_name(Mode mode);
int buffer_push(struct Buffer *buf, const void *bytes, unsigned long n);

#endif
"#;
    let precise = records(src, Backend::TreeSitter);
    let fallback = records(src, Backend::Regex);
    assert_eq!(precise, fallback);

    assert_eq!(precise.macros.len(), 1);
    assert_eq!(precise.macros[0].name, "CONFIG_H");
    assert_eq!(precise.types[0].name, "Mode");
    assert_eq!(precise.types[1].member_count, 3);
    assert_eq!(precise.apis[0].return_type, "const char*");
    assert_eq!(precise.apis[1].param_count, 3);
}

#[test]
fn test_verifier_counts_sample_faithfully() {
    let counts = heuristic_counts(SAMPLE_C);
    let report = verify(SAMPLE_C, &records(SAMPLE_C, Backend::TreeSitter));

    let heuristic = |category| report.check(category).unwrap().heuristic_count;
    assert_eq!(heuristic(Category::Macros), counts.macros);
    assert_eq!(heuristic(Category::Types), counts.types);
    assert_eq!(heuristic(Category::Structs), 2);
    assert_eq!(heuristic(Category::Enums), 2);
    assert_eq!(heuristic(Category::Apis), counts.apis);
    assert!(report.all_match(), "{}", report);
}
