use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Digit run '{segment}' in '{raw}' does not fit in 64 bits")]
    Overflow { raw: String, segment: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VersionSetError {
    #[error("Cannot find an upper bound in an empty version set")]
    Empty,

    #[error("Version set must be sorted before searching it")]
    Unsorted,
}

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid tag filter '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
