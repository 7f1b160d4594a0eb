//! Clap-free settings for the check pipeline.

use adprochk_archive::LoadOptions;
use adprochk_edit::RepairOptions;
use camino::Utf8PathBuf;

/// Settings for one check run.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub input: Utf8PathBuf,
    /// Where to write the repaired archive; `None` means check only.
    pub fix_output: Option<Utf8PathBuf>,

    // Archive layout
    pub load: LoadOptions,

    // Repair behaviour
    pub repair: RepairOptions,
}

impl CheckSettings {
    pub fn new(input: impl Into<Utf8PathBuf>) -> Self {
        Self {
            input: input.into(),
            fix_output: None,
            load: LoadOptions::default(),
            repair: RepairOptions::default(),
        }
    }

    pub fn with_fix_output(mut self, output: impl Into<Utf8PathBuf>) -> Self {
        self.fix_output = Some(output.into());
        self
    }
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self::new("project.adpro")
    }
}
