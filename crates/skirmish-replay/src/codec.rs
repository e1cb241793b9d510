//! Stream framing for whole replay sessions.
//!
//! Layout — textual decimal tokens, one space after each; the map block is
//! the only raw binary region:
//!
//! ```text
//! [ "0" keyframeInterval ]  width height <raw width*height bytes>
//! frameCount
//!   frame_0 | diff_0        (frame 0 always full)
//!   ...
//! unitCount
//!   key_0 value_0 ...
//! ```
//!
//! A stream opens with the literal token `0` only when a keyframe interval
//! is present; a real map can never be 0 tiles wide, which is what makes
//! the sentinel unambiguous. That is a format assumption, not a validated
//! property. There is no end-of-stream marker — the counts are trusted, and
//! trailing bytes after the last pair are left unconsumed.

use std::io::{Read, Write};

use indexmap::IndexMap;

use skirmish_core::tokens::{read_i32, read_int, read_u32, write_int};
use skirmish_core::{Frame, FrameDiff, UnitTypeId};

use crate::error::ReplayError;
use crate::keyframe::is_full_frame;
use crate::session::ReplaySession;
use crate::terrain::TerrainGrid;

/// How a stream's leading token was resolved.
///
/// The wire overloads the first integer: a literal `0` announces that a
/// keyframe interval follows before the width, anything else already is
/// the width. Parsing the ambiguity into a variant keeps the decision in
/// one place instead of threading a repurposed integer through the decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HeaderLead {
    /// Sentinel form: the keyframe interval, read after the `0` token.
    Sentinel { keyframe_interval: u32 },
    /// Plain form: the first token was the map width itself.
    Width(i64),
}

fn read_header_lead(r: &mut dyn Read) -> Result<HeaderLead, ReplayError> {
    let lead = read_int(r)?;
    if lead == 0 {
        Ok(HeaderLead::Sentinel {
            keyframe_interval: read_u32(r)?,
        })
    } else {
        Ok(HeaderLead::Width(lead))
    }
}

/// Encode a session to a stream.
///
/// Frames at keyframe indices are written in full via the collaborator's
/// writer; all others are written as the diff against their immediate
/// predecessor.
pub fn encode_session<F: Frame>(
    w: &mut dyn Write,
    session: &ReplaySession<F>,
) -> Result<(), ReplayError> {
    let map = session.map();
    if session.keyframe_interval() != 0 {
        write_int(w, 0)?;
        write_int(w, i64::from(session.keyframe_interval()))?;
    }
    write_int(w, i64::from(map.width()))?;
    write_int(w, i64::from(map.height()))?;
    w.write_all(map.packed())?;

    let frames = session.frames();
    write_int(w, frames.len() as i64)?;
    for (index, frame) in frames.iter().enumerate() {
        if is_full_frame(index, session.keyframe_interval()) {
            frame.write_to(w)?;
        } else {
            F::diff(&frames[index - 1], frame).write_to(w)?;
        }
    }

    write_int(w, session.unit_counts().len() as i64)?;
    for (unit_type, count) in session.unit_counts() {
        write_int(w, i64::from(unit_type.0))?;
        write_int(w, i64::from(*count))?;
    }
    Ok(())
}

/// Decode a session from a stream in one atomic pass.
///
/// Every structural check fails fast and aborts the whole decode; frames
/// already reconstructed live in a staging vector that is dropped on the
/// early return, so callers never observe a partially built session.
pub fn decode_session<F: Frame>(r: &mut dyn Read) -> Result<ReplaySession<F>, ReplayError> {
    let (keyframe_interval, width, height) = match read_header_lead(r)? {
        HeaderLead::Sentinel { keyframe_interval } => {
            (keyframe_interval, read_int(r)?, read_int(r)?)
        }
        HeaderLead::Width(width) => (0, width, read_int(r)?),
    };
    if width <= 0 || height <= 0 {
        return Err(ReplayError::InvalidMapSize { width, height });
    }
    let (Ok(grid_width), Ok(grid_height)) = (u32::try_from(width), u32::try_from(height))
    else {
        return Err(ReplayError::InvalidMapSize { width, height });
    };

    // The height token's terminating separator was the single byte between
    // the header and the map block, so the raw bytes start immediately.
    let mut tiles = vec![0u8; grid_width as usize * grid_height as usize];
    r.read_exact(&mut tiles)?;
    let map = TerrainGrid::from_packed(grid_width, grid_height, tiles)?;

    let frame_count = read_int(r)?;
    if frame_count < 0 {
        return Err(ReplayError::NegativeFrameCount { count: frame_count });
    }
    let frame_count = frame_count as usize;

    let mut frames: Vec<F> = Vec::with_capacity(frame_count);
    for index in 0..frame_count {
        if is_full_frame(index, keyframe_interval) {
            frames.push(F::read_from(r)?);
        } else {
            let diff = F::Diff::read_from(r)?;
            // Frame 0 is always a keyframe, so a delta always has a
            // predecessor; checked rather than assumed.
            let prior = frames
                .last()
                .ok_or(ReplayError::MissingPredecessor { index })?;
            frames.push(F::undiff(&diff, prior));
        }
    }

    let table_len = read_int(r)?;
    if table_len < 0 {
        return Err(ReplayError::NegativeUnitCount { count: table_len });
    }
    let mut unit_counts = IndexMap::with_capacity(table_len as usize);
    for _ in 0..table_len {
        let unit_type = UnitTypeId(read_i32(r)?);
        let count = read_i32(r)?;
        unit_counts.insert(unit_type, count);
    }

    Ok(ReplaySession::from_parts(
        map,
        keyframe_interval,
        frames,
        unit_counts,
    ))
}
