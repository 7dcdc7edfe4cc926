use std::fs;
use std::path::PathBuf;

use crass::config::Config;
use crass::test_utils::{TestCase, run_table_tests};

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn parse_fixture(relative: &str) -> Config {
    let content = fs::read_to_string(fixture_path(relative)).expect("read fixture");
    toml::from_str(&content).expect("parse config")
}

#[test]
fn config_build_and_pdf_from_fixture() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "default",
            input: "tests/fixtures/configs/default.toml",
            expected: (
                PathBuf::from("build"),
                None,
                "wkhtmltopdf".to_string(),
                "A4".to_string(),
                0usize,
            ),
            should_panic: false,
        },
        TestCase {
            name: "custom",
            input: "tests/fixtures/configs/custom.toml",
            expected: (
                PathBuf::from("dist/cv"),
                Some(PathBuf::from("themes/metro")),
                "/opt/wkhtmltopdf/bin/wkhtmltopdf".to_string(),
                "Letter".to_string(),
                1usize,
            ),
            should_panic: false,
        },
    ];

    run_table_tests(cases, |relative_path| {
        let config = parse_fixture(relative_path);
        (
            config.build.out_dir,
            config.build.theme,
            config.pdf.command,
            config.pdf.page_size,
            config.pdf.extra_args.len(),
        )
    })
}

#[test]
fn config_slug_rules_from_fixture() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "default_section",
            input: ("tests/fixtures/configs/custom.toml", "work"),
            expected: vec!["title".to_string(), "name".to_string()],
            should_panic: false,
        },
        TestCase {
            name: "publications_override",
            input: ("tests/fixtures/configs/custom.toml", "publications"),
            expected: vec!["title".to_string()],
            should_panic: false,
        },
        TestCase {
            name: "projects_override",
            input: ("tests/fixtures/configs/custom.toml", "projects"),
            expected: vec!["name".to_string(), "url".to_string()],
            should_panic: false,
        },
        TestCase {
            name: "stock_order",
            input: ("tests/fixtures/configs/default.toml", "awards"),
            expected: ["name", "network", "organization", "institution", "title", "language"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            should_panic: false,
        },
    ];

    run_table_tests(cases, |(relative_path, section)| {
        parse_fixture(relative_path)
            .slug_rules()
            .fields_for(Some(section))
            .to_vec()
    })
}

#[test]
fn explicit_config_file_is_layered_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crass.toml");
    fs::write(&path, "[pdf]\npage_size = \"Letter\"\n").unwrap();

    let config = Config::load(Some(&path), None).unwrap();
    assert_eq!(config.pdf.page_size, "Letter");
    assert_eq!(config.pdf.command, "wkhtmltopdf");
    assert_eq!(config.slugs.label_fields[0], "name");
}

#[test]
fn malformed_config_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crass.toml");
    fs::write(&path, "[pdf\n").unwrap();

    let err = Config::load(Some(&path), None).unwrap_err();
    assert_eq!(err.code(), "config");
}
