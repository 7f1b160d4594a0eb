use crate::manifest::tags;
use crate::xml;
use adprochk_types::FatalError;
use xmltree::Element;

/// One per-task program document; declares the program's own name in `<pgmName>`.
#[derive(Debug, Clone)]
pub struct ProgramDocument {
    entry: String,
    root: Element,
    modified: bool,
}

impl ProgramDocument {
    /// Parse a program document. A missing or empty `<pgmName>` is fatal.
    pub fn parse(entry: &str, bytes: &[u8]) -> Result<Self, FatalError> {
        let root = xml::parse(bytes).map_err(|message| FatalError::CorruptProgram {
            entry: entry.to_string(),
            message,
        })?;
        let doc = Self {
            entry: entry.to_string(),
            root,
            modified: false,
        };
        if doc.declared_name().is_none() {
            return Err(FatalError::MissingField {
                document: entry.to_string(),
                field: tags::PROGRAM_NAME.to_string(),
            });
        }
        Ok(doc)
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    fn declared_name(&self) -> Option<String> {
        xml::find_first(&self.root, tags::PROGRAM_NAME)
            .and_then(|e| e.get_text())
            .map(|t| t.into_owned())
            .filter(|t| !t.is_empty())
    }

    pub fn name(&self) -> String {
        self.declared_name().unwrap_or_default()
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), FatalError> {
        let field = xml::find_first_mut(&mut self.root, tags::PROGRAM_NAME).ok_or_else(|| {
            FatalError::MissingField {
                document: self.entry.clone(),
                field: tags::PROGRAM_NAME.to_string(),
            }
        })?;
        xml::set_text(field, name);
        self.modified = true;
        Ok(())
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FatalError> {
        xml::serialize(&self.root).map_err(|message| FatalError::CorruptProgram {
            entry: self.entry.clone(),
            message,
        })
    }
}
