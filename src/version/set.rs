//! Sorted collections of generic versions and upper-bound lookup

use crate::version::error::{VersionError, VersionSetError};
use crate::version::generic::Version;

/// An ordered collection of versions.
///
/// Duplicates are kept. The set remembers whether it has been sorted since the
/// last mutation so that [`VersionSet::upper_bound`] can refuse to binary search
/// an unsorted sequence.
#[derive(Debug, Clone, Default)]
pub struct VersionSet {
    versions: Vec<Version>,
    sorted: bool,
}

impl VersionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every tag into a version, stopping at the first failure.
    pub fn from_tags<'a, I>(tags: I) -> Result<Self, VersionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tags.into_iter()
            .map(Version::parse)
            .collect::<Result<Self, _>>()
    }

    pub fn push(&mut self, version: Version) {
        self.versions.push(version);
        self.sorted = false;
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Version> {
        self.versions.iter()
    }

    /// Sort ascending by segments. Equal versions keep their insertion order.
    pub fn sort(&mut self) {
        self.versions.sort_by(Version::cmp_segments);
        self.sorted = true;
    }

    /// Find the first version that `reference` is strictly less than.
    ///
    /// When `reference` is not less than any member, the greatest member is
    /// returned instead, so callers always get a concrete candidate and must
    /// compare it with `reference` themselves to tell whether it is newer.
    ///
    /// # Errors
    /// * `VersionSetError::Empty` - the set has no members
    /// * `VersionSetError::Unsorted` - the set was modified after the last sort
    pub fn upper_bound(&self, reference: &Version) -> Result<&Version, VersionSetError> {
        let last = self.versions.last().ok_or(VersionSetError::Empty)?;
        if !self.sorted {
            return Err(VersionSetError::Unsorted);
        }

        // `reference.less(v)` is false for a prefix of a sorted set and true for the rest
        let index = self
            .versions
            .partition_point(|version| !reference.less(version));

        Ok(self.versions.get(index).unwrap_or(last))
    }
}

impl FromIterator<Version> for VersionSet {
    fn from_iter<T: IntoIterator<Item = Version>>(iter: T) -> Self {
        Self {
            versions: iter.into_iter().collect(),
            sorted: false,
        }
    }
}

impl<'a> IntoIterator for &'a VersionSet {
    type Item = &'a Version;
    type IntoIter = std::slice::Iter<'a, Version>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sorted_set(tags: &[&str]) -> VersionSet {
        let mut set = VersionSet::from_tags(tags.iter().copied()).unwrap();
        set.sort();
        set
    }

    fn raws(set: &VersionSet) -> Vec<&str> {
        set.iter().map(Version::raw).collect()
    }

    #[test]
    fn sort_orders_by_digit_runs() {
        let set = sorted_set(&["v1.2", "v2", "v1.3", "v0.0.1-1", "v1.0", "0.0.1-2"]);

        assert_eq!(
            raws(&set),
            vec!["v0.0.1-1", "0.0.1-2", "v1.0", "v1.2", "v1.3", "v2"]
        );
    }

    #[test]
    fn sort_keeps_duplicates_in_insertion_order() {
        let set = sorted_set(&["v1.1", "2", "1.1", "v1.1", "alpha", "beta"]);

        assert_eq!(raws(&set), vec!["alpha", "beta", "v1.1", "1.1", "v1.1", "2"]);
    }

    #[rstest]
    #[case("3.0", "2.0")] // greater than all, clamps to the maximum
    #[case("2.0", "2.0")] // equal to the maximum
    #[case("1.2", "1.5")]
    #[case("1.0", "1.5")] // exact match moves to the next member
    #[case("0.9", "1.0")]
    #[case("1", "1.0")] // prefix is less
    #[case("latest", "1.0")] // no digits is less than everything with digits
    fn upper_bound_returns_first_greater_member(#[case] reference: &str, #[case] expected: &str) {
        let set = sorted_set(&["1.0", "1.5", "2.0"]);
        let reference = Version::parse(reference).unwrap();

        assert_eq!(set.upper_bound(&reference).unwrap().raw(), expected);
    }

    #[test]
    fn upper_bound_single_member_is_always_returned() {
        let set = sorted_set(&["v3"]);

        for reference in ["v1", "v3", "v9"] {
            let reference = Version::parse(reference).unwrap();
            assert_eq!(set.upper_bound(&reference).unwrap().raw(), "v3");
        }
    }

    #[test]
    fn upper_bound_on_empty_set_is_an_error() {
        let mut set = VersionSet::new();
        set.sort();
        let reference = Version::parse("1.0").unwrap();

        assert_eq!(set.upper_bound(&reference), Err(VersionSetError::Empty));
    }

    #[test]
    fn upper_bound_before_sort_is_an_error() {
        let set = VersionSet::from_tags(["2.0", "1.0"]).unwrap();
        let reference = Version::parse("1.0").unwrap();

        assert!(!set.is_sorted());
        assert_eq!(set.upper_bound(&reference), Err(VersionSetError::Unsorted));
    }

    #[test]
    fn push_after_sort_requires_sorting_again() {
        let mut set = sorted_set(&["1.0", "2.0"]);
        set.push(Version::parse("1.5").unwrap());
        let reference = Version::parse("1.2").unwrap();

        assert_eq!(set.upper_bound(&reference), Err(VersionSetError::Unsorted));

        set.sort();
        assert_eq!(set.upper_bound(&reference).unwrap().raw(), "1.5");
    }

    #[test]
    fn from_tags_stops_at_first_overflow() {
        let result = VersionSet::from_tags(["1.0", "99999999999999999999999", "2.0"]);

        assert!(matches!(result, Err(VersionError::Overflow { .. })));
    }

    #[test]
    fn collect_from_versions_is_unsorted() {
        let set: VersionSet = ["1", "2"]
            .into_iter()
            .map(|tag| Version::parse(tag).unwrap())
            .collect();

        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        assert!(!set.is_sorted());
    }
}
