use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

/// Behaviour switches of a [`GridTable`](super::GridTable).
///
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridConfig {
    /// When false every filtered row is shown on a single page.
    pub paginated: bool,
    /// Initial page size.
    pub page_size: usize,
    /// Sizes cycled through by the page-size action.
    pub page_sizes: Cow<'static, [usize]>,
    /// When false the global filter is ignored.
    pub searchable: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GridConfig {
    pub const fn new() -> Self {
        Self {
            paginated: true,
            page_size: PAGE_SIZES[0],
            page_sizes: Cow::Borrowed(&PAGE_SIZES),
            searchable: true,
        }
    }

    #[must_use]
    pub const fn paginated(mut self, paginated: bool) -> Self {
        self.paginated = paginated;
        self
    }

    #[must_use]
    pub const fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn page_sizes(mut self, page_sizes: impl Into<Cow<'static, [usize]>>) -> Self {
        self.page_sizes = page_sizes.into();
        self
    }

    #[must_use]
    pub const fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Rejects zero page sizes.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.page_size == 0 || self.page_sizes.contains(&0) {
            return Err(GridError::InvalidPageSize);
        }
        Ok(())
    }

    /// The size after `current` in `page_sizes`, wrapping; the first size when `current`
    /// is not listed.
    pub(crate) fn next_page_size(&self, current: usize) -> Option<usize> {
        let sizes = self.page_sizes.as_ref();
        let next = sizes
            .iter()
            .position(|&size| size == current)
            .map_or(0, |idx| (idx + 1) % sizes.len());
        sizes.get(next).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_page_size_selector() {
        let config = GridConfig::default();
        assert!(config.paginated);
        assert!(config.searchable);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.page_sizes.as_ref(), &[10, 20, 50, 100]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert_eq!(
            GridConfig::new().page_size(0).validate(),
            Err(GridError::InvalidPageSize)
        );
        assert_eq!(
            GridConfig::new().page_sizes(vec![5, 0]).validate(),
            Err(GridError::InvalidPageSize)
        );
    }

    #[test]
    fn page_sizes_cycle() {
        let config = GridConfig::new();
        assert_eq!(config.next_page_size(10), Some(20));
        assert_eq!(config.next_page_size(100), Some(10));
        assert_eq!(config.next_page_size(7), Some(10));
        assert_eq!(GridConfig::new().page_sizes(Vec::new()).next_page_size(10), None);
    }
}
