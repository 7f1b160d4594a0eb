#![no_main]

use adprochk_archive::{LoadOptions, ProjectArchive, load_project, rebuild};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut archive) = ProjectArchive::from_bytes("fuzz.adpro", data.to_vec()) else {
        return;
    };
    let _ = load_project(&mut archive, &LoadOptions::default());
    let _ = rebuild(&mut archive, Vec::new());
});
