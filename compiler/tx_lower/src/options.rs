//! Translation options read by passes.

/// How generated code manages object lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryManagement {
    /// Manual retain/release; retained results are requested per expression.
    #[default]
    ReferenceCounting,
    /// Automatic reference counting; every created array is a retained result.
    Arc,
}

/// Options parsed from the command line by the driver.
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    pub memory_management: MemoryManagement,
}

impl TranslateOptions {
    #[must_use]
    pub fn with_memory_management(mut self, memory_management: MemoryManagement) -> Self {
        self.memory_management = memory_management;
        self
    }

    pub fn use_arc(&self) -> bool {
        self.memory_management == MemoryManagement::Arc
    }

    /// Merge another option set into this one. ARC wins.
    pub fn merge(&mut self, other: &Self) {
        if other.use_arc() {
            self.memory_management = MemoryManagement::Arc;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_reference_counting() {
        let options = TranslateOptions::default();
        assert_eq!(options.memory_management, MemoryManagement::ReferenceCounting);
        assert!(!options.use_arc());
    }

    #[test]
    fn merge_keeps_arc() {
        let mut options = TranslateOptions::default();
        options.merge(&TranslateOptions::default().with_memory_management(MemoryManagement::Arc));
        assert!(options.use_arc());
        options.merge(&TranslateOptions::default());
        assert!(options.use_arc());
    }
}
