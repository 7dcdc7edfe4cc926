use std::path::PathBuf;

use crass::core::{FilterRule, OutputKind, OutputTarget, Overwrite, VibesFile};
use crass::test_utils::fixtures::{SAMPLE_VIBES, UnitTestFixture};
use crass::test_utils::{TestCase, run_table_tests};
use serde_yaml::Value;

fn parse(yaml: &str) -> crass::Result<VibesFile> {
    let value: Value = serde_yaml::from_str(yaml).unwrap();
    VibesFile::from_value(&value)
}

#[test]
fn output_target_table() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "bare_html",
            input: "html",
            expected: OutputTarget::Kind(OutputKind::Html),
            should_panic: false,
        },
        TestCase {
            name: "bare_pdf_mixed_case",
            input: "PDF",
            expected: OutputTarget::Kind(OutputKind::Pdf),
            should_panic: false,
        },
        TestCase {
            name: "file_path",
            input: "out/cv.pdf",
            expected: OutputTarget::File {
                kind: OutputKind::Pdf,
                path: PathBuf::from("out/cv.pdf"),
            },
            should_panic: false,
        },
        TestCase {
            name: "unknown_kind",
            input: "docx",
            expected: OutputTarget::Unsupported("docx".to_string()),
            should_panic: false,
        },
        TestCase {
            name: "unknown_extension",
            input: "cv.odt",
            expected: OutputTarget::Unsupported("cv.odt".to_string()),
            should_panic: false,
        },
    ];

    run_table_tests(cases, OutputTarget::parse)
}

#[test]
fn sample_vibes_parse() {
    let file = parse(SAMPLE_VIBES).unwrap();
    assert_eq!(file.len(), 2);

    let full = file.get("Full").unwrap();
    assert_eq!(full.filter, FilterRule::Include(true));
    assert_eq!(full.file_stem(), "full");

    let short = file.get("Short").unwrap();
    assert_eq!(short.unsupported_outputs().collect::<Vec<_>>(), vec!["docx"]);
    assert_eq!(short.theme_options.get("title"), Some(&Value::from("Short CV")));
    assert!(matches!(short.filter, FilterRule::Nested(ref spec) if spec.len() == 3));
    assert_eq!(short.overwrite, Overwrite::Absent);
}

#[test]
fn schema_errors() {
    let cases = [
        ("not a list", "name: solo\noutput: [html]\n"),
        ("missing name", "- output: [html]\n"),
        ("empty outputs", "- name: a\n  output: []\n"),
        ("unknown field", "- name: a\n  output: [html]\n  colour: red\n"),
        ("bad filter", "- name: a\n  output: [html]\n  filter: 3\n"),
    ];
    for (label, yaml) in cases {
        let err = parse(yaml).unwrap_err();
        assert_eq!(err.code(), "schema", "{label}: {err}");
    }
}

#[test]
fn overwrite_is_carried_but_inert() {
    let file = parse("- name: a\n  output: [html]\n  overwrite: {basics: {name: Someone}}\n").unwrap();
    assert!(matches!(
        file.vibes()[0].overwrite,
        Overwrite::NotImplemented(_)
    ));
}

#[test]
fn load_rebases_relative_paths() {
    let fixture = UnitTestFixture::new();
    let path = fixture.create_file(
        "cv/vibes.yaml",
        "- name: Print\n  theme: themes/print\n  includes: static\n  outputs: [print/cv.pdf, /tmp/abs.html, html]\n",
    );

    let file = VibesFile::load(&path).unwrap();
    let vibe = &file.vibes()[0];
    let base = fixture.data_path.join("cv");
    assert_eq!(vibe.theme, Some(base.join("themes/print")));
    assert_eq!(vibe.includes, Some(base.join("static")));
    assert_eq!(
        vibe.outputs,
        vec![
            OutputTarget::File {
                kind: OutputKind::Pdf,
                path: base.join("print/cv.pdf"),
            },
            OutputTarget::File {
                kind: OutputKind::Html,
                path: PathBuf::from("/tmp/abs.html"),
            },
            OutputTarget::Kind(OutputKind::Html),
        ]
    );
}

#[test]
fn select_by_name() {
    let file = parse("- name: a\n  output: [html]\n- name: b\n  output: [pdf]\n- name: a\n  output: [pdf]\n").unwrap();

    assert_eq!(file.select(&[]).unwrap().len(), 3);
    let picked = file.select(&["a".to_string()]).unwrap();
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].outputs, vec![OutputTarget::Kind(OutputKind::Html)]);
    assert_eq!(file.duplicate_names(), vec!["a"]);

    let err = file.select(&["zzz".to_string()]).unwrap_err();
    assert_eq!(err.code(), "not_found");
}
