#![no_main]

use arbitrary::Arbitrary;
use guardon::{FixAction, PreviewOptions, Suggestion, preview_patch};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    yaml: String,
    doc_index: u8,
    target_path: String,
    snippet_yaml: Option<String>,
    remove: bool,
    full_stream: bool,
}

fuzz_target!(|input: Input| {
    let suggestion = Suggestion {
        action: if input.remove {
            FixAction::Remove
        } else {
            FixAction::Insert
        },
        target_path: input.target_path,
        snippet_obj: None,
        snippet_yaml: input.snippet_yaml,
        hint: String::new(),
    };
    let options = PreviewOptions {
        full_stream: input.full_stream,
    };
    let _ = preview_patch(&input.yaml, input.doc_index as usize, &suggestion, options);
});
