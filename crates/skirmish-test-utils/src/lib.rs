//! Mock frame types for skirmish codec tests.
//!
//! Provides [`MockFrame`] / [`MockFrameDiff`], a minimal implementation of
//! the [`Frame`] and [`FrameDiff`] collaborator traits: a tick number plus
//! a flat vector of unit state values. Enough structure to exercise the
//! keyframe/delta machinery without dragging in a game engine.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::io::{Read, Write};

use skirmish_core::tokens::{read_int, write_int, TokenError};
use skirmish_core::{Frame, FrameDiff};

/// A minimal game-state snapshot: one tick number and per-unit values.
///
/// Wire sub-format: `tick len v0 v1 ... ` — plain decimal tokens, each with
/// its trailing separator, so it composes with the session framing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockFrame {
    pub tick: i64,
    pub values: Vec<i64>,
}

impl MockFrame {
    pub fn new(tick: i64, values: Vec<i64>) -> Self {
        Self { tick, values }
    }
}

/// Delta between two consecutive [`MockFrame`]s: the new tick plus the
/// indices whose values changed.
///
/// Assumes consecutive frames never shrink their value vector, which holds
/// for every sequence the tests build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockFrameDiff {
    pub tick: i64,
    pub changes: Vec<(usize, i64)>,
}

impl Frame for MockFrame {
    type Diff = MockFrameDiff;

    fn write_to(&self, w: &mut dyn Write) -> Result<(), TokenError> {
        write_int(w, self.tick)?;
        write_int(w, self.values.len() as i64)?;
        for &v in &self.values {
            write_int(w, v)?;
        }
        Ok(())
    }

    fn read_from(r: &mut dyn Read) -> Result<Self, TokenError> {
        let tick = read_int(r)?;
        let len = usize::try_from(read_int(r)?).map_err(|_| TokenError::Overflow)?;
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(read_int(r)?);
        }
        Ok(Self { tick, values })
    }

    fn diff(prior: &Self, current: &Self) -> MockFrameDiff {
        let changes = current
            .values
            .iter()
            .enumerate()
            .filter(|&(i, v)| prior.values.get(i) != Some(v))
            .map(|(i, &v)| (i, v))
            .collect();
        MockFrameDiff {
            tick: current.tick,
            changes,
        }
    }

    fn undiff(diff: &MockFrameDiff, prior: &Self) -> Self {
        let mut values = prior.values.clone();
        for &(i, v) in &diff.changes {
            if i < values.len() {
                values[i] = v;
            } else {
                values.resize(i, 0);
                values.push(v);
            }
        }
        Self {
            tick: diff.tick,
            values,
        }
    }
}

impl FrameDiff for MockFrameDiff {
    fn write_to(&self, w: &mut dyn Write) -> Result<(), TokenError> {
        write_int(w, self.tick)?;
        write_int(w, self.changes.len() as i64)?;
        for &(i, v) in &self.changes {
            write_int(w, i as i64)?;
            write_int(w, v)?;
        }
        Ok(())
    }

    fn read_from(r: &mut dyn Read) -> Result<Self, TokenError> {
        let tick = read_int(r)?;
        let len = usize::try_from(read_int(r)?).map_err(|_| TokenError::Overflow)?;
        let mut changes = Vec::with_capacity(len);
        for _ in 0..len {
            let i = usize::try_from(read_int(r)?).map_err(|_| TokenError::Overflow)?;
            changes.push((i, read_int(r)?));
        }
        Ok(Self { tick, changes })
    }
}

/// Build a run of frames where unit `j` in frame `i` holds `(i * stride + j)`,
/// so every frame differs from its predecessor in every value.
pub fn mock_run(frame_count: usize, units: usize, stride: i64) -> Vec<MockFrame> {
    (0..frame_count)
        .map(|i| {
            let values = (0..units)
                .map(|j| i as i64 * stride + j as i64)
                .collect();
            MockFrame::new(i as i64, values)
        })
        .collect()
}
