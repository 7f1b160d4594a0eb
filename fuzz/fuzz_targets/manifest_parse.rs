#![no_main]

use adprochk_edit::{Manifest, ProgramDocument};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(manifest) = Manifest::parse("program.prj", data) {
        let tasks = manifest.task_names();
        let nodes = manifest.node_names();
        let _ = manifest.container_keys();

        // Whatever parsed must serialize and parse back to the same identifiers.
        if let Ok(bytes) = manifest.to_bytes() {
            let again = Manifest::parse("program.prj", &bytes).expect("reparse serialized manifest");
            assert_eq!(again.task_names(), tasks);
            assert_eq!(again.node_names(), nodes);
        }
    }

    if let Ok(doc) = ProgramDocument::parse("task1.rll", data) {
        assert!(!doc.name().is_empty());
    }
});
