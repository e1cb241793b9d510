//! Replay stream codec for recorded RTS games.
//!
//! Serializes and deserializes a whole recorded game — a bit-packed terrain
//! map, a keyframe/delta frame sequence, and a per-unit-type count table —
//! as one byte stream suitable for file storage.
//!
//! # Architecture
//!
//! - [`terrain`] packs four per-tile attributes into one byte per tile
//! - [`keyframe`] is the pure full-vs-delta placement policy, shared by the
//!   encode and decode paths
//! - [`codec`] owns the stream framing and all corruption checks
//! - [`session`] is the owning aggregate the other pieces hang off
//!
//! Frames themselves are opaque: anything implementing the
//! [`Frame`](skirmish_core::Frame) collaborator trait from `skirmish-core`
//! can be recorded.
//!
//! # Format
//!
//! ```text
//! [ "0" keyframeInterval ]  width height <raw width*height bytes>
//! frameCount  frame_0 [frame_or_diff_1 ...]
//! unitCount   key_0 value_0 ...
//! ```
//!
//! Tokens are whitespace-separated decimal text; the map block is raw
//! binary. The leading `0` sentinel appears only when a keyframe interval
//! is configured — a real map can never be 0 tiles wide.
//!
//! Decoding is atomic: any structural violation aborts the pass and no
//! partially built session is observable.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod keyframe;
pub mod session;
pub mod terrain;

pub use codec::{decode_session, encode_session};
pub use error::ReplayError;
pub use keyframe::is_full_frame;
pub use session::ReplaySession;
pub use terrain::{
    pack_tile, unpack_tile, StartLocations, TerrainAttributes, TerrainGrid, TileAttributes,
};
