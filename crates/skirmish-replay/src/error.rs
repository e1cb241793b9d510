//! Error types for the replay codec.

use std::fmt;
use std::io;

use skirmish_core::tokens::TokenError;
use skirmish_core::TilePos;

/// Errors that can occur while encoding or decoding a replay stream.
///
/// Two families. [`ReplayError::Io`] wraps transport failures and is
/// propagated as-is — retry semantics belong to the transport, not the
/// codec. Every other variant is a structural violation: the decode fails
/// fast and no partially built session is ever returned.
#[derive(Debug)]
pub enum ReplayError {
    /// An I/O error from the underlying stream.
    Io(io::Error),
    /// Map dimensions are not both positive.
    InvalidMapSize {
        /// The width token as read.
        width: i64,
        /// The height token as read.
        height: i64,
    },
    /// The frame count token is negative.
    NegativeFrameCount {
        /// The count token as read.
        count: i64,
    },
    /// The unit-count table size token is negative.
    NegativeUnitCount {
        /// The size token as read.
        count: i64,
    },
    /// A textual token could not be parsed.
    MalformedToken {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A delta frame appeared where no reconstructed predecessor exists.
    MissingPredecessor {
        /// The frame index at which the delta was found.
        index: usize,
    },
    /// An attribute array does not cover `width * height` tiles.
    AttributeLengthMismatch {
        /// Which attribute array is wrong.
        name: &'static str,
        /// `width * height`.
        expected: usize,
        /// The length supplied.
        found: usize,
    },
    /// A start location lies outside the grid.
    StartLocationOutOfBounds {
        /// The offending coordinate.
        pos: TilePos,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
}

impl ReplayError {
    /// True for every variant except [`ReplayError::Io`]: the stream was
    /// readable but its contents violated the format.
    pub fn is_corruption(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMapSize { width, height } => {
                write!(f, "corrupted replay: invalid map size {width}x{height}")
            }
            Self::NegativeFrameCount { count } => {
                write!(f, "corrupted replay: negative frame count {count}")
            }
            Self::NegativeUnitCount { count } => {
                write!(f, "corrupted replay: negative unit-count table size {count}")
            }
            Self::MalformedToken { detail } => {
                write!(f, "corrupted replay: {detail}")
            }
            Self::MissingPredecessor { index } => {
                write!(
                    f,
                    "corrupted replay: delta at frame {index} has no predecessor"
                )
            }
            Self::AttributeLengthMismatch {
                name,
                expected,
                found,
            } => {
                write!(
                    f,
                    "{name} array has {found} entries, grid needs {expected}"
                )
            }
            Self::StartLocationOutOfBounds { pos, width, height } => {
                write!(
                    f,
                    "start location {pos} outside {width}x{height} grid"
                )
            }
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<TokenError> for ReplayError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Io(e) => Self::Io(e),
            other => Self::MalformedToken {
                detail: other.to_string(),
            },
        }
    }
}
