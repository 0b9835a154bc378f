#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let descriptor = selector::parse(data);
    assert_ne!(descriptor.id.as_deref(), Some(""));
    assert_ne!(descriptor.class_names.as_deref(), Some(""));
    assert_ne!(descriptor.inline_text.as_deref(), Some(""));
    assert!(descriptor.classes().all(|class| !class.is_empty()));
});
