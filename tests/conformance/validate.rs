use super::common::{load_cases, run_suite};
use guardon::{Rule, validate};

#[derive(Debug, serde::Deserialize)]
struct ValidateCase {
    name: String,
    document: String,
    rules: Vec<Rule>,
    expected: Vec<ExpectedResult>,
}

#[derive(Debug, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpectedResult {
    rule_id: String,
    path: String,
    doc_index: usize,
}

#[test]
fn validate_suite() {
    let cases: Vec<ValidateCase> = load_cases("validate.yaml");
    assert!(!cases.is_empty());
    run_suite(
        "validate",
        &cases,
        |c| c.name.as_str(),
        |c| {
            let actual: Vec<ExpectedResult> = validate(&c.document, &c.rules)
                .into_iter()
                .map(|r| ExpectedResult {
                    rule_id: r.rule_id,
                    path: r.path.unwrap_or_default(),
                    doc_index: r.doc_index.unwrap_or(usize::MAX),
                })
                .collect();
            if actual == c.expected {
                Ok(())
            } else {
                Err(format!("expected {:?}, got {:?}", c.expected, actual))
            }
        },
    );
}
