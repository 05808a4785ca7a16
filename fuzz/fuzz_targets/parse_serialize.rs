#![no_main]

use libfuzzer_sys::fuzz_target;

// Any text must parse, and so must the markup written back for it.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let dom = html::parse_document(input);
    let mut found = Vec::new();
    html::collect_text_nodes(&dom, &mut found);
    let written = html::serialize(&dom);
    let _ = html::serialize(&html::parse_document(&written));
});
