//! Keyframe placement policy.
//!
//! One pure function decides, per frame index, whether the stream stores a
//! full snapshot or a delta against the previous frame. Both the encode and
//! decode paths call it, so the two sites cannot drift apart.

/// True if the frame at `index` is stored as a full snapshot.
///
/// An interval of 0 disables delta storage entirely. Otherwise every
/// `interval`-th frame (0-based) is full and the rest are deltas against
/// their immediate predecessor. Frame 0 is always full.
#[must_use]
pub fn is_full_frame(index: usize, keyframe_interval: u32) -> bool {
    keyframe_interval == 0 || index % keyframe_interval as usize == 0
}
