//! Bit-packed terrain grid codec.
//!
//! Each tile packs four attributes into one byte: walkability (bit 0),
//! buildability (bit 1), ground height (bits 2-4), and a start-location
//! flag (bit 5). Bits 6-7 are unused but round-trip as written. The packed
//! byte is the sole persisted representation; the start-location list is
//! derived from bit 5 on unpack.

use smallvec::SmallVec;

use skirmish_core::TilePos;

use crate::error::ReplayError;

/// Bit position of the walkability flag.
pub const WALKABLE_SHIFT: u8 = 0;
/// Bit position of the buildability flag.
pub const BUILDABLE_SHIFT: u8 = 1;
/// Bit position of the ground-height field.
pub const HEIGHT_SHIFT: u8 = 2;
/// Mask for ground height; the engine's height range is 0-5, hence 3 bits.
pub const HEIGHT_MASK: u8 = 0b111;
/// Bit position of the start-location flag.
pub const START_LOC_SHIFT: u8 = 5;

/// Start-location list. RTS maps rarely mark more than eight.
pub type StartLocations = SmallVec<[TilePos; 8]>;

/// Logical per-tile attributes, unpacked from one byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileAttributes {
    /// Ground units can traverse this tile.
    pub walkable: bool,
    /// Buildings can be placed on this tile.
    pub buildable: bool,
    /// Terrain elevation, 0-5.
    pub ground_height: u8,
    /// This tile is a valid player starting position.
    pub start_location: bool,
}

/// Pack tile attributes into a single byte.
///
/// Heights outside 0-5 are silently masked to 3 bits — the height range is
/// a game-engine constant, not something the codec validates.
pub fn pack_tile(attrs: TileAttributes) -> u8 {
    u8::from(attrs.walkable) << WALKABLE_SHIFT
        | u8::from(attrs.buildable) << BUILDABLE_SHIFT
        | (attrs.ground_height & HEIGHT_MASK) << HEIGHT_SHIFT
        | u8::from(attrs.start_location) << START_LOC_SHIFT
}

/// Unpack a tile byte. Bits 6-7 are ignored.
pub fn unpack_tile(byte: u8) -> TileAttributes {
    TileAttributes {
        walkable: (byte >> WALKABLE_SHIFT) & 1 == 1,
        buildable: (byte >> BUILDABLE_SHIFT) & 1 == 1,
        ground_height: (byte >> HEIGHT_SHIFT) & HEIGHT_MASK,
        start_location: (byte >> START_LOC_SHIFT) & 1 == 1,
    }
}

/// Flat per-tile attribute arrays plus the start-location list, as produced
/// by [`TerrainGrid::to_attributes`].
///
/// Arrays use the `x * height + y` layout (x-major, y-minor) shared with
/// [`TerrainGrid::from_attributes`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TerrainAttributes {
    /// 0/1 per tile.
    pub walkability: Vec<u8>,
    /// 0-5 per tile.
    pub ground_height: Vec<u8>,
    /// 0/1 per tile.
    pub buildability: Vec<u8>,
    /// Tiles with the start-location bit set, in x-outer, y-inner scan order.
    pub start_locations: StartLocations,
}

/// The static terrain map for one game, one packed byte per tile.
///
/// Dimensions are always at least 1x1; tiles are stored flat at index
/// `x * height + y`, the same layout the attribute arrays use, so the
/// stream codec can write the backing store verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    tiles: Vec<u8>,
}

impl TerrainGrid {
    /// Build a grid from already-packed tile bytes.
    ///
    /// `tiles` must hold exactly `width * height` bytes in x-major order.
    /// Reserved bits 6-7 are preserved as given.
    pub fn from_packed(width: u32, height: u32, tiles: Vec<u8>) -> Result<Self, ReplayError> {
        if width == 0 || height == 0 {
            return Err(ReplayError::InvalidMapSize {
                width: i64::from(width),
                height: i64::from(height),
            });
        }
        let expected = width as usize * height as usize;
        if tiles.len() != expected {
            return Err(ReplayError::AttributeLengthMismatch {
                name: "packed tile",
                expected,
                found: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Pack flat attribute arrays into a fresh grid.
    ///
    /// Inputs are addressed `x * height + y` and must each hold
    /// `width * height` entries. Walkability and buildability use their low
    /// bit; heights are masked to 3 bits. Start locations are OR'd in after
    /// packing and must lie inside the grid.
    ///
    /// The grid is freshly allocated on every call, so re-encoding never
    /// inherits stale start-location bits.
    pub fn from_attributes(
        width: u32,
        height: u32,
        walkability: &[u8],
        ground_height: &[u8],
        buildability: &[u8],
        start_locations: &[TilePos],
    ) -> Result<Self, ReplayError> {
        if width == 0 || height == 0 {
            return Err(ReplayError::InvalidMapSize {
                width: i64::from(width),
                height: i64::from(height),
            });
        }
        let tile_count = width as usize * height as usize;
        for (name, array) in [
            ("walkability", walkability),
            ("ground height", ground_height),
            ("buildability", buildability),
        ] {
            if array.len() != tile_count {
                return Err(ReplayError::AttributeLengthMismatch {
                    name,
                    expected: tile_count,
                    found: array.len(),
                });
            }
        }

        let mut tiles = Vec::with_capacity(tile_count);
        for x in 0..width {
            for y in 0..height {
                let i = x as usize * height as usize + y as usize;
                tiles.push(pack_tile(TileAttributes {
                    walkable: walkability[i] & 1 == 1,
                    buildable: buildability[i] & 1 == 1,
                    ground_height: ground_height[i],
                    start_location: false,
                }));
            }
        }
        for &pos in start_locations {
            if pos.x >= width || pos.y >= height {
                return Err(ReplayError::StartLocationOutOfBounds {
                    pos,
                    width,
                    height,
                });
            }
            tiles[pos.x as usize * height as usize + pos.y as usize] |= 1 << START_LOC_SHIFT;
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Unpack the grid back into flat attribute arrays.
    ///
    /// Arrays come back in the same `x * height + y` layout the encoder
    /// accepts. The start-location list is rebuilt by scanning tiles in
    /// x-outer, y-inner order, so its order is deterministic.
    pub fn to_attributes(&self) -> TerrainAttributes {
        let mut out = TerrainAttributes {
            walkability: Vec::with_capacity(self.tiles.len()),
            ground_height: Vec::with_capacity(self.tiles.len()),
            buildability: Vec::with_capacity(self.tiles.len()),
            start_locations: SmallVec::new(),
        };
        for x in 0..self.width {
            for y in 0..self.height {
                let attrs =
                    unpack_tile(self.tiles[x as usize * self.height as usize + y as usize]);
                out.walkability.push(u8::from(attrs.walkable));
                out.ground_height.push(attrs.ground_height);
                out.buildability.push(u8::from(attrs.buildable));
                if attrs.start_location {
                    out.start_locations.push(TilePos::new(x, y));
                }
            }
        }
        out
    }

    /// Grid width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw packed tile bytes, x-major — exactly what the stream codec
    /// writes as the map block.
    pub fn packed(&self) -> &[u8] {
        &self.tiles
    }

    /// The packed byte at `pos`, or `None` outside the grid.
    pub fn tile(&self, pos: TilePos) -> Option<u8> {
        if pos.x < self.width && pos.y < self.height {
            Some(self.tiles[pos.x as usize * self.height as usize + pos.y as usize])
        } else {
            None
        }
    }

    /// Unpacked attributes at `pos`, or `None` outside the grid.
    pub fn attributes_at(&self, pos: TilePos) -> Option<TileAttributes> {
        self.tile(pos).map(unpack_tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // The worked example: walkable, not buildable, height 3 packs to
    // 0b0000_1101; the start-location bit adds 0b0010_0000.
    #[test]
    fn packed_byte_layout() {
        let attrs = TileAttributes {
            walkable: true,
            buildable: false,
            ground_height: 3,
            start_location: false,
        };
        assert_eq!(pack_tile(attrs), 0b0000_1101);
        assert_eq!(
            pack_tile(TileAttributes {
                start_location: true,
                ..attrs
            }),
            0b0010_1101
        );
    }

    #[test]
    fn worked_example_grid() {
        let grid = TerrainGrid::from_attributes(
            2,
            2,
            &[1, 1, 1, 1],
            &[3, 3, 3, 3],
            &[0, 0, 0, 0],
            &[TilePos::new(1, 0)],
        )
        .unwrap();

        assert_eq!(grid.packed(), &[0b0000_1101, 0b0000_1101, 0b0010_1101, 0b0000_1101]);

        let attrs = grid.to_attributes();
        assert_eq!(attrs.walkability, vec![1, 1, 1, 1]);
        assert_eq!(attrs.ground_height, vec![3, 3, 3, 3]);
        assert_eq!(attrs.buildability, vec![0, 0, 0, 0]);
        assert_eq!(attrs.start_locations.as_slice(), &[TilePos::new(1, 0)]);
    }

    #[test]
    fn height_is_masked_not_rejected() {
        // 9 & 0b111 == 1: lossy by design, never an error.
        let grid =
            TerrainGrid::from_attributes(1, 1, &[0], &[9], &[0], &[]).unwrap();
        assert_eq!(grid.to_attributes().ground_height, vec![1]);
    }

    #[test]
    fn start_locations_scan_x_outer_y_inner() {
        let grid = TerrainGrid::from_attributes(
            3,
            2,
            &[0; 6],
            &[0; 6],
            &[0; 6],
            &[TilePos::new(2, 1), TilePos::new(0, 1), TilePos::new(1, 0)],
        )
        .unwrap();
        // Rebuilt in scan order regardless of encode order.
        assert_eq!(
            grid.to_attributes().start_locations.as_slice(),
            &[TilePos::new(0, 1), TilePos::new(1, 0), TilePos::new(2, 1)]
        );
    }

    #[test]
    fn start_location_out_of_bounds_is_checked() {
        let err = TerrainGrid::from_attributes(
            2,
            2,
            &[0; 4],
            &[0; 4],
            &[0; 4],
            &[TilePos::new(2, 0)],
        )
        .unwrap_err();
        assert!(matches!(err, ReplayError::StartLocationOutOfBounds { .. }));
    }

    #[test]
    fn wrong_array_length_rejected() {
        let err =
            TerrainGrid::from_attributes(2, 2, &[0; 3], &[0; 4], &[0; 4], &[]).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::AttributeLengthMismatch {
                name: "walkability",
                expected: 4,
                found: 3,
            }
        ));
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(matches!(
            TerrainGrid::from_attributes(0, 2, &[], &[], &[], &[]),
            Err(ReplayError::InvalidMapSize { .. })
        ));
        assert!(matches!(
            TerrainGrid::from_packed(2, 0, Vec::new()),
            Err(ReplayError::InvalidMapSize { .. })
        ));
    }

    #[test]
    fn reserved_bits_roundtrip_through_packed() {
        let raw = vec![0b1100_0000, 0b1010_1101];
        let grid = TerrainGrid::from_packed(2, 1, raw.clone()).unwrap();
        // Unpacking ignores bits 6-7 but the backing bytes are untouched.
        assert_eq!(grid.packed(), raw.as_slice());
        assert_eq!(
            grid.attributes_at(TilePos::new(0, 0)).unwrap(),
            TileAttributes::default()
        );
    }

    #[test]
    fn tile_accessors_bounds_checked() {
        let grid = TerrainGrid::from_packed(2, 2, vec![0; 4]).unwrap();
        assert!(grid.tile(TilePos::new(1, 1)).is_some());
        assert!(grid.tile(TilePos::new(2, 0)).is_none());
        assert!(grid.attributes_at(TilePos::new(0, 2)).is_none());
    }

    fn arb_grid_inputs() -> impl Strategy<
        Value = (u32, u32, Vec<u8>, Vec<u8>, Vec<u8>, Vec<TilePos>),
    > {
        (1u32..12, 1u32..12).prop_flat_map(|(w, h)| {
            let n = (w * h) as usize;
            (
                Just(w),
                Just(h),
                prop::collection::vec(0u8..=1, n),
                prop::collection::vec(0u8..=5, n),
                prop::collection::vec(0u8..=1, n),
                prop::collection::vec((0..w, 0..h).prop_map(|(x, y)| TilePos::new(x, y)), 0..4),
            )
        })
    }

    proptest! {
        #[test]
        fn attribute_roundtrip((w, h, walk, height, build, starts) in arb_grid_inputs()) {
            let grid = TerrainGrid::from_attributes(w, h, &walk, &height, &build, &starts)
                .unwrap();
            let attrs = grid.to_attributes();
            prop_assert_eq!(attrs.walkability, walk);
            prop_assert_eq!(attrs.ground_height, height);
            prop_assert_eq!(attrs.buildability, build);
            // Order-independent set equality; duplicates collapse onto one bit.
            let mut expected: Vec<_> = starts.clone();
            expected.sort_unstable();
            expected.dedup();
            let mut got: Vec<_> = attrs.start_locations.into_iter().collect();
            got.sort_unstable();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn pack_unpack_inverse(byte in any::<u8>()) {
            // Low six bits survive an unpack/pack cycle; reserved bits drop.
            let repacked = pack_tile(unpack_tile(byte));
            prop_assert_eq!(repacked, byte & 0b0011_1111);
        }
    }
}
