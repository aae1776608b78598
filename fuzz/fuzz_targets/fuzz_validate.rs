#![no_main]

use arbitrary::Arbitrary;
use guardon::{Rule, validate};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    yaml: String,
    match_path: String,
    pattern: Option<String>,
    required: bool,
    kind: Option<String>,
}

fuzz_target!(|input: Input| {
    let rule = Rule {
        pattern: input.pattern,
        required: input.required,
        kind: input.kind,
        ..Rule::new("fuzz", input.match_path)
    };
    for result in validate(&input.yaml, &[rule]) {
        if result.is_parse_error() {
            assert!(result.message.starts_with("Invalid YAML: "));
        }
    }
});
