//! Core types and traits for the skirmish replay codec.
//!
//! This crate carries the pieces shared between the codec and anything that
//! implements the frame side of the format:
//!
//! - [`tokens`] — the whitespace-separated decimal token layer the wire
//!   format is built on
//! - [`traits`] — the [`Frame`] / [`FrameDiff`] collaborator traits
//! - [`id`] — strongly-typed identifiers ([`UnitTypeId`], [`TilePos`])
//!
//! The codec itself lives in `skirmish-replay`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod tokens;
pub mod traits;

pub use id::{TilePos, UnitTypeId};
pub use tokens::TokenError;
pub use traits::{Frame, FrameDiff};
