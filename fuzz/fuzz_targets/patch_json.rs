#![no_main]

use dispatch::{Patch, dispatch};
use dom::{BuildItem, Document, PropertyBag, TreeBuilder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let Ok(patch) = Patch::from_json(&value) else {
        return;
    };
    let mut doc = Document::new();
    let root = doc.root();
    let target = doc.create_element("div");
    if TreeBuilder::default()
        .build(
            &mut doc,
            target,
            vec![BuildItem::Props(PropertyBag::new().with("stateID", "target"))],
        )
        .is_err()
    {
        return;
    }
    if doc.append_child(root, target).is_err() {
        return;
    }
    // Errors are fine; panics and registry drift are not.
    let _ = dispatch(&mut doc, "target", Some(&patch));
    for key in doc.query_state_id("target") {
        assert!(doc.contains(key) && doc.is_connected(key));
    }
});
