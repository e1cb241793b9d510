//! Collaborator traits for frame snapshots and their deltas.
//!
//! The replay codec never looks inside a frame. It only requires that a
//! frame can serialize itself, deserialize back, and diff against its
//! immediate predecessor. Game engines implement these traits for their
//! own snapshot types; tests use the mocks in `skirmish-test-utils`.

use std::io::{Read, Write};

use crate::tokens::TokenError;

/// A full snapshot of dynamic game state at one tick.
///
/// The serialized sub-format is the implementor's own. It must be
/// self-delimiting and leave the stream at a token boundary — every token
/// the implementor writes carries its own trailing separator, the same
/// discipline as [`crate::tokens::write_int`].
pub trait Frame: Sized {
    /// The compact delta type produced by [`Frame::diff`].
    type Diff: FrameDiff;

    /// Serialize this frame to a stream.
    fn write_to(&self, w: &mut dyn Write) -> Result<(), TokenError>;

    /// Deserialize a frame from a stream.
    fn read_from(r: &mut dyn Read) -> Result<Self, TokenError>;

    /// Compute the delta from `prior` to `current`.
    ///
    /// Total function with the inverse contract
    /// `undiff(&diff(prior, current), prior) == current`.
    fn diff(prior: &Self, current: &Self) -> Self::Diff;

    /// Apply a delta to the immediately preceding reconstructed frame.
    ///
    /// `prior` must be the exact frame the delta was computed against.
    /// Supplying any other frame yields an unspecified result — this is a
    /// correctness contract on the caller, not something implementors are
    /// expected to detect.
    fn undiff(diff: &Self::Diff, prior: &Self) -> Self;
}

/// A compact delta between two consecutive [`Frame`]s.
pub trait FrameDiff: Sized {
    /// Serialize this delta to a stream.
    fn write_to(&self, w: &mut dyn Write) -> Result<(), TokenError>;

    /// Deserialize a delta from a stream.
    fn read_from(r: &mut dyn Read) -> Result<Self, TokenError>;
}
