//! Memory adapter configuration.

/// Configuration for a [`crate::MemoryAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Whether the adapter advertises transaction support.
    pub transactions: bool,

    /// Whether commit fails if the store changed since begin.
    pub conflict_detection: bool,

    /// Whether `LIKE` ignores case.
    pub case_insensitive_like: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            transactions: true,
            conflict_detection: true,
            case_insensitive_like: false,
        }
    }
}

impl MemoryConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether transactions are supported.
    #[must_use]
    pub const fn transactions(mut self, value: bool) -> Self {
        self.transactions = value;
        self
    }

    /// Sets whether commits detect concurrent changes.
    #[must_use]
    pub const fn conflict_detection(mut self, value: bool) -> Self {
        self.conflict_detection = value;
        self
    }

    /// Sets whether `LIKE` ignores case.
    #[must_use]
    pub const fn case_insensitive_like(mut self, value: bool) -> Self {
        self.case_insensitive_like = value;
        self
    }
}
