use thiserror::Error;

/// Violations of the forest contract reported by [`validate_forest`](crate::validate_forest).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForestError {
    /// The same id appears more than once anywhere in the forest.
    #[error("duplicate row id `{0}`")]
    DuplicateId(String),

    /// A top-level row declares a non-zero level.
    #[error("root row `{id}` has level {level}, expected 0")]
    RootLevel {
        /// Offending row id.
        id: String,
        /// Declared level.
        level: u16,
    },

    /// A child row's level is not its parent's level plus one.
    #[error("row `{id}` has level {found}, expected {expected}")]
    LevelMismatch {
        /// Offending row id.
        id: String,
        /// Parent level + 1.
        expected: u16,
        /// Declared level.
        found: u16,
    },

    /// The declared `parent_id` does not name the row's structural parent.
    #[error("row `{id}` declares parent {found:?}, but is nested under {expected:?}")]
    ParentMismatch {
        /// Offending row id.
        id: String,
        /// Id of the structural parent (`None` for roots).
        expected: Option<String>,
        /// Declared `parent_id`.
        found: Option<String>,
    },
}

/// Errors raised while building a [`GridTable`](crate::GridTable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Two column descriptors share the same id.
    #[error("duplicate column id `{0}`")]
    DuplicateColumn(&'static str),

    /// A column descriptor has an empty id.
    #[error("column at position {0} has an empty id")]
    EmptyColumnId(usize),

    /// The configured page size is zero.
    #[error("page size must be at least 1")]
    InvalidPageSize,
}
