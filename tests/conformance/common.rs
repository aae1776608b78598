use std::path::PathBuf;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Load a fixture file as a list of cases.
pub fn load_cases<T: serde::de::DeserializeOwned>(name: &str) -> Vec<T> {
    let path = fixtures_dir().join(name);
    let content = std::fs::read_to_string(&path).unwrap();
    serde_saphyr::from_str(&content).unwrap()
}

/// Run every case, print each failure and a summary, then fail if any case did.
pub fn run_suite<T>(
    suite: &str,
    cases: &[T],
    name: impl Fn(&T) -> &str,
    check: impl Fn(&T) -> Result<(), String>,
) {
    let mut passed = 0;
    let mut failed = 0;

    for case in cases {
        match check(case) {
            Ok(()) => passed += 1,
            Err(msg) => {
                eprintln!("  FAIL {}: {}", name(case), msg);
                failed += 1;
            }
        }
    }

    eprintln!(
        "\n{}: {} passed, {} failed out of {} total",
        suite,
        passed,
        failed,
        cases.len()
    );
    assert_eq!(failed, 0, "{} {} tests failed", failed, suite);
}
