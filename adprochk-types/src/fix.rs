/// A pending archive patch: the entry to replace and its new contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixFile {
    pub entry: String,
    pub contents: Vec<u8>,
}

impl FixFile {
    pub fn new(entry: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            entry: entry.into(),
            contents,
        }
    }
}
