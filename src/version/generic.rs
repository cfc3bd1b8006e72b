//! Generic, loosely structured versions
//!
//! Tags such as `v1.2.3`, `2021.04` or `release-7` carry no common format, so a
//! [`Version`] keeps only the numbers found in them. Every maximal run of ASCII
//! digits becomes one segment, left to right; everything else separates runs.
//!
//! Ordering compares segments element-wise and treats a strict prefix as the
//! smaller value, so `v1.1` < `v1.1.1` and `2` > `v1.1.1`. Tags without digits
//! (`alpha`, `beta`) all compare equal.

use std::cmp::Ordering;
use std::fmt;

use crate::version::error::VersionError;

/// A tag parsed into its numeric segments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    raw: String,
    segments: Vec<u64>,
}

impl Version {
    /// Parse a tag into a version.
    ///
    /// Succeeds for any input whose digit runs fit in a `u64`, including the
    /// empty string and strings without any digits.
    ///
    /// Examples:
    /// - "v1.2.3" -> [1, 2, 3]
    /// - "2021.04" -> [2021, 4]
    /// - "release-7" -> [7]
    /// - "alpha" -> []
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let segments = digit_runs(raw)
            .map(|run| {
                run.parse::<u64>().map_err(|_| VersionError::Overflow {
                    raw: raw.to_string(),
                    segment: run.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The tag this version was parsed from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Returns true if `self` orders strictly before `other`.
    pub fn less(&self, other: &Version) -> bool {
        self.cmp_segments(other) == Ordering::Less
    }

    /// Compare two versions by their segments only, ignoring the raw text.
    ///
    /// Slice ordering on the segments is exactly the rule we want: the first
    /// differing segment decides, and a strict prefix sorts first.
    pub fn cmp_segments(&self, other: &Version) -> Ordering {
        self.segments.as_slice().cmp(other.segments.as_slice())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Iterate over the maximal runs of ASCII digits in `s`.
fn digit_runs(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
}
