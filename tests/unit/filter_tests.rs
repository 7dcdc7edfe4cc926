use crass::core::{
    CurriculumVitae, DocumentFormat, FilterRule, FilterSpec, SlugRules, TreePath, apply_filter,
    resolve_slugs,
};
use crass::test_utils::fixtures::SAMPLE_CV;
use crass::test_utils::{TestCase, run_table_tests};
use serde_yaml::Value;

fn sample() -> Value {
    let cv = CurriculumVitae::parse(SAMPLE_CV, DocumentFormat::Yaml).unwrap();
    resolve_slugs(&cv, &SlugRules::default()).unwrap().into_value()
}

fn rule(yaml: &str) -> FilterRule {
    let value: Value = serde_yaml::from_str(yaml).unwrap();
    FilterRule::from_value(&value, &TreePath::root()).unwrap()
}

fn top_keys(value: &Value) -> Vec<String> {
    value
        .as_mapping()
        .map(|map| map.keys().filter_map(Value::as_str).map(ToString::to_string).collect())
        .unwrap_or_default()
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

#[test]
fn top_level_sections_table() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "include_everything",
            input: "true",
            expected: keys(&["basics", "work", "education", "skills"]),
            should_panic: false,
        },
        TestCase {
            name: "exclude_everything",
            input: "false",
            expected: keys(&[]),
            should_panic: false,
        },
        TestCase {
            name: "unmentioned_keys_dropped",
            input: "{skills: true}",
            expected: keys(&["skills"]),
            should_panic: false,
        },
        TestCase {
            name: "cv_order_not_filter_order",
            input: "{skills: true, basics: true}",
            expected: keys(&["basics", "skills"]),
            should_panic: false,
        },
        TestCase {
            name: "explicit_false",
            input: "{basics: false, work: true}",
            expected: keys(&["work"]),
            should_panic: false,
        },
        TestCase {
            name: "filter_key_missing_from_cv",
            input: "{awards: true, basics: true}",
            expected: keys(&["basics"]),
            should_panic: false,
        },
    ];

    let cv = sample();
    run_table_tests(cases, |input| {
        let outcome = apply_filter(&cv, &rule(input)).unwrap();
        top_keys(&outcome.value)
    })
}

#[test]
fn slug_list_keeps_cv_order_and_warns_once() {
    let cv = sample();
    let outcome = apply_filter(&cv, &rule("{work: [globex, acme-co, nope, nope]}")).unwrap();

    let names = outcome.value["work"]
        .as_sequence()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Acme Co", "Globex"]);

    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].slug, "nope");
    assert_eq!(outcome.warnings[0].path, "work");
    assert_eq!(outcome.warnings[0].available, vec!["acme-co", "initech", "globex"]);
}

#[test]
fn nested_rule_applies_to_every_item() {
    let cv = sample();
    let outcome = apply_filter(&cv, &rule("{work: {position: true}}")).unwrap();
    let work = outcome.value["work"].as_sequence().unwrap();
    assert_eq!(work.len(), 3);
    assert_eq!(work[0]["position"], "Engineer");
    assert!(work[0].get("name").is_none());
    assert!(work[2].as_mapping().unwrap().is_empty());
}

#[test]
fn built_spec_matches_parsed_rule() {
    let spec = FilterSpec::new()
        .with("basics", FilterRule::Nested(FilterSpec::new().with("name", FilterRule::Include(true))))
        .with("work", FilterRule::Slugs(vec!["initech".to_string()]));
    assert_eq!(
        FilterRule::Nested(spec),
        rule("{basics: {name: true}, work: [initech]}")
    );
}

#[test]
fn source_tree_is_untouched() {
    let cv = sample();
    let before = cv.clone();
    let _ = apply_filter(&cv, &rule("{work: [initech], basics: {name: true}}")).unwrap();
    assert_eq!(cv, before);
}

#[test]
fn shape_mismatch_is_schema_error() {
    let cv = sample();
    let err = apply_filter(&cv, &rule("{basics: {name: [ada]}}")).unwrap_err();
    assert_eq!(err.code(), "schema");
    assert!(err.to_string().contains("basics.name"));
}

#[test]
fn malformed_rule_is_rejected() {
    let value: Value = serde_yaml::from_str("{work: \"acme\"}").unwrap();
    let err = FilterRule::from_value(&value, &TreePath::root()).unwrap_err();
    assert_eq!(err.code(), "schema");
}
