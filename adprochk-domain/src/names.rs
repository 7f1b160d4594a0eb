/// Deterministic candidate names for one colliding identifier.
///
/// Yields `base`, then `base_1`, `base_2`, ... on each [`advance`](Self::advance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameGenerator {
    base: String,
    suffix: u32,
}

impl NameGenerator {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            suffix: 0,
        }
    }

    pub fn current(&self) -> String {
        if self.suffix == 0 {
            self.base.clone()
        } else {
            format!("{}_{}", self.base, self.suffix)
        }
    }

    pub fn advance(&mut self) -> String {
        self.suffix += 1;
        self.current()
    }
}
