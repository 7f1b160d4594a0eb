use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitmask describing the outcome of one check run.
///
/// The low six bits carry findings; bits 24 and up are reserved for fatal
/// conditions that stop the run before (or during) reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckStatus(u32);

impl CheckStatus {
    pub const CLEAN: Self = Self(0);

    pub const DUPLICATE_NODE: Self = Self(1 << 0);
    pub const DUPLICATE_TASK: Self = Self(1 << 1);
    pub const DUPLICATE_PROGRAM: Self = Self(1 << 2);
    pub const MISSING_NODE: Self = Self(1 << 3);
    pub const MISSING_TASK: Self = Self(1 << 4);
    pub const MISSING_PROGRAM: Self = Self(1 << 5);

    pub const ARCHIVE_UNREADABLE: Self = Self(1 << 24);
    pub const CORRUPT_MANIFEST: Self = Self(1 << 25);
    pub const CORRUPT_PROGRAM: Self = Self(1 << 26);
    pub const MISSING_FIELD: Self = Self(1 << 27);
    pub const REPAIR_ABORTED: Self = Self(1 << 28);
    pub const OUTPUT_FAILED: Self = Self(1 << 29);
    pub const INVALID_INVOCATION: Self = Self(1 << 30);

    const FINDINGS_MASK: u32 = 0x3F;
    const FATAL_SHIFT: u32 = 24;

    const LABELS: [(CheckStatus, &'static str); 13] = [
        (Self::DUPLICATE_NODE, "duplicate_node"),
        (Self::DUPLICATE_TASK, "duplicate_task"),
        (Self::DUPLICATE_PROGRAM, "duplicate_program"),
        (Self::MISSING_NODE, "missing_node"),
        (Self::MISSING_TASK, "missing_task"),
        (Self::MISSING_PROGRAM, "missing_program"),
        (Self::ARCHIVE_UNREADABLE, "archive_unreadable"),
        (Self::CORRUPT_MANIFEST, "corrupt_manifest"),
        (Self::CORRUPT_PROGRAM, "corrupt_program"),
        (Self::MISSING_FIELD, "missing_field"),
        (Self::REPAIR_ABORTED, "repair_aborted"),
        (Self::OUTPUT_FAILED, "output_failed"),
        (Self::INVALID_INVOCATION, "invalid_invocation"),
    ];

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_clean(self) -> bool {
        self.0 == 0
    }

    pub const fn has_findings(self) -> bool {
        self.0 & Self::FINDINGS_MASK != 0
    }

    pub const fn is_fatal(self) -> bool {
        self.0 >> Self::FATAL_SHIFT != 0
    }

    /// Map to an 8-bit process exit code.
    ///
    /// Findings pass through verbatim. Fatal runs set bit 7 and carry the fatal
    /// bits shifted down into bits 0..=6.
    pub const fn exit_code(self) -> u8 {
        if self.is_fatal() {
            0x80 | ((self.0 >> Self::FATAL_SHIFT) & 0x7F) as u8
        } else {
            (self.0 & Self::FINDINGS_MASK) as u8
        }
    }

    /// Stable snake_case names of every bit that is set, lowest bit first.
    pub fn labels(self) -> Vec<&'static str> {
        Self::LABELS
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, label)| *label)
            .collect()
    }
}

impl BitOr for CheckStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CheckStatus {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return f.write_str("clean");
        }
        write!(f, "{:#x} ({})", self.0, self.labels().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::CheckStatus;

    #[test]
    fn findings_bits_follow_documented_layout() {
        assert_eq!(CheckStatus::DUPLICATE_NODE.bits(), 1);
        assert_eq!(CheckStatus::DUPLICATE_TASK.bits(), 2);
        assert_eq!(CheckStatus::DUPLICATE_PROGRAM.bits(), 4);
        assert_eq!(CheckStatus::MISSING_NODE.bits(), 8);
        assert_eq!(CheckStatus::MISSING_TASK.bits(), 16);
        assert_eq!(CheckStatus::MISSING_PROGRAM.bits(), 32);
    }

    #[test]
    fn fatal_status_maps_to_high_exit_code() {
        let status = CheckStatus::CORRUPT_MANIFEST;
        assert!(status.is_fatal());
        assert!(!status.has_findings());
        assert_eq!(status.exit_code(), 0x80 | 0x02);
    }

    #[test]
    fn display_lists_labels() {
        let status = CheckStatus::DUPLICATE_TASK | CheckStatus::MISSING_NODE;
        assert_eq!(status.to_string(), "0xa (duplicate_task, missing_node)");
        assert_eq!(CheckStatus::CLEAN.to_string(), "clean");
    }
}
