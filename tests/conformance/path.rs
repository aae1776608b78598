use super::common::{load_cases, run_suite};
use guardon::path::get;
use serde_json::Value;

#[derive(Debug, serde::Deserialize)]
struct GetCase {
    name: String,
    input: GetInput,
    expected: Value,
    #[serde(default)]
    absent: bool,
}

#[derive(Debug, serde::Deserialize)]
struct GetInput {
    path: String,
    value: Value,
}

#[test]
fn path_get_suite() {
    let cases: Vec<GetCase> = load_cases("path-get.yaml");
    assert!(!cases.is_empty());
    run_suite(
        "path_get",
        &cases,
        |c| c.name.as_str(),
        |c| {
            let actual = get(&c.input.value, &c.input.path);
            match (c.absent, actual) {
                (true, None) => Ok(()),
                (true, Some(v)) => Err(format!("expected absent, got {}", v)),
                (false, None) => Err("expected a value, got absent".to_string()),
                (false, Some(v)) if *v == c.expected => Ok(()),
                (false, Some(v)) => Err(format!("expected {}, got {}", c.expected, v)),
            }
        },
    );
}
