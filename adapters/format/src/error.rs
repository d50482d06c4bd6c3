//! Errors reported while parsing the text format.

use thiserror::Error;

/// Failure to turn text into a scenario. No partial result is ever produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input never declared a map with a `C` line.
    #[error("no map found in the input file")]
    NoMapFound,
    /// A line could not be accepted.
    #[error("invalid line {line} in the input file: {reason}")]
    InvalidLine {
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: LineError,
    },
}

/// Reason a single line was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    /// The record tag is not one of `C`, `M`, `T` or `A`.
    #[error("unknown record tag `{0}`")]
    UnknownTag(String),
    /// The record does not have the number of fields its tag requires.
    #[error("expected {expected} fields, found {found}")]
    FieldCount {
        /// Fields required by the tag, the tag included.
        expected: usize,
        /// Fields present on the line.
        found: usize,
    },
    /// A numeric field is not a non-negative integer.
    #[error("{field} must be a non-negative integer, found `{value}`")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// Raw field content.
        value: String,
    },
    /// The map has no cells.
    #[error("map dimensions must be positive")]
    EmptyMap,
    /// A second `C` line was found.
    #[error("the map was already declared on line {first}")]
    DuplicateMap {
        /// Line of the first declaration.
        first: usize,
    },
    /// The facing is not one of `N`, `E`, `S` or `W`.
    #[error("unknown direction `{0}`")]
    InvalidDirection(String),
    /// An instruction character is not one of `A`, `D` or `G`.
    #[error("unknown instruction `{0}`")]
    InvalidInstruction(char),
    /// The adventurer starts outside the map.
    #[error("adventurer starts outside the map")]
    OutOfBounds,
    /// The adventurer starts on a mountain.
    #[error("adventurer starts on a mountain")]
    OnMountain,
    /// The adventurer starts on the cell of an earlier adventurer.
    #[error("adventurer starts on the cell of the adventurer declared on line {other}")]
    Overlap {
        /// Line declaring the earlier adventurer.
        other: usize,
    },
}
