//! The replay session aggregate.

use std::io::{Read, Write};

use indexmap::IndexMap;

use skirmish_core::{Frame, UnitTypeId};

use crate::codec::{decode_session, encode_session};
use crate::error::ReplayError;
use crate::terrain::TerrainGrid;

/// A complete recorded game: terrain, frame sequence, and unit-count table.
///
/// Frames are owned by value, so a session is either fully built or not
/// observable at all — decoding stages frames into a local vector and only
/// a successful decode produces a session. Generic over the [`Frame`]
/// collaborator, which the codec treats as opaque.
///
/// # Examples
///
/// ```
/// use skirmish_replay::{ReplaySession, TerrainGrid};
/// use skirmish_test_utils::MockFrame;
///
/// let map = TerrainGrid::from_attributes(2, 2, &[1; 4], &[0; 4], &[1; 4], &[]).unwrap();
/// let mut session = ReplaySession::new(map, 2);
/// session.push_frame(MockFrame::new(0, vec![10, 20]));
/// session.push_frame(MockFrame::new(1, vec![10, 21]));
/// session.set_unit_count(7.into(), 2);
///
/// let mut buf = Vec::new();
/// session.write_to(&mut buf).unwrap();
/// let decoded: ReplaySession<MockFrame> = ReplaySession::read_from(&mut buf.as_slice()).unwrap();
/// assert_eq!(decoded.frames(), session.frames());
/// assert_eq!(decoded.unit_count(7.into()), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ReplaySession<F: Frame> {
    map: TerrainGrid,
    keyframe_interval: u32,
    frames: Vec<F>,
    unit_counts: IndexMap<UnitTypeId, i32>,
}

impl<F: Frame> ReplaySession<F> {
    /// Create an empty session with the given terrain and keyframe interval.
    ///
    /// Interval 0 stores every frame as a full snapshot; interval N stores a
    /// full snapshot every N frames and deltas in between.
    pub fn new(map: TerrainGrid, keyframe_interval: u32) -> Self {
        Self {
            map,
            keyframe_interval,
            frames: Vec::new(),
            unit_counts: IndexMap::new(),
        }
    }

    pub(crate) fn from_parts(
        map: TerrainGrid,
        keyframe_interval: u32,
        frames: Vec<F>,
        unit_counts: IndexMap<UnitTypeId, i32>,
    ) -> Self {
        Self {
            map,
            keyframe_interval,
            frames,
            unit_counts,
        }
    }

    /// The terrain map.
    pub fn map(&self) -> &TerrainGrid {
        &self.map
    }

    /// Replace the terrain map. The prior grid is discarded, never merged.
    pub fn set_map(&mut self, map: TerrainGrid) {
        self.map = map;
    }

    /// The configured keyframe interval.
    pub fn keyframe_interval(&self) -> u32 {
        self.keyframe_interval
    }

    /// Append a frame at the next tick index.
    pub fn push_frame(&mut self, frame: F) {
        self.frames.push(frame);
    }

    /// All frames, in tick order.
    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    /// The frame at `index`, or `None` past the end.
    pub fn frame(&self, index: usize) -> Option<&F> {
        self.frames.get(index)
    }

    /// Number of recorded frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Record the count for a unit type, replacing any prior value.
    pub fn set_unit_count(&mut self, unit_type: UnitTypeId, count: i32) {
        self.unit_counts.insert(unit_type, count);
    }

    /// The recorded count for a unit type.
    pub fn unit_count(&self, unit_type: UnitTypeId) -> Option<i32> {
        self.unit_counts.get(&unit_type).copied()
    }

    /// The full unit-count table.
    pub fn unit_counts(&self) -> &IndexMap<UnitTypeId, i32> {
        &self.unit_counts
    }

    /// Serialize this session to a stream. See [`encode_session`].
    pub fn write_to(&self, w: &mut dyn Write) -> Result<(), ReplayError> {
        encode_session(w, self)
    }

    /// Decode a session from a stream in one atomic pass.
    /// See [`decode_session`].
    pub fn read_from(r: &mut dyn Read) -> Result<Self, ReplayError> {
        decode_session(r)
    }
}
