//! Geometry mapper: module defect masks to grid bin coordinates.
//!
//! A module occupies a fixed 8 x 2 bin footprint in its region's grid, one
//! bin per readout chip. Mask bits 0..=7 fill one row of the footprint and
//! bits 8..=15 the other row in reverse order (serpentine), mirroring the
//! physical chip layout. Two orientation rules modify the footprint:
//!
//! - the column direction reverses for barrel modules with
//!   `(layer == 1 && module > 0) || (layer > 1 && module < 0)` and for
//!   forward modules on positive disks;
//! - a "flipped" module swaps the two rows, i.e. mirrors the footprint
//!   about its horizontal midline. Barrel flip state comes from the
//!   outer-ladder hint, inverted when `layer > 1 && module < 0`; forward
//!   flip state is `panel == 1` on positive disks and `panel == 2` on
//!   negative ones.
//!
//! These conventions encode the physical layout; they are pinned by the
//! exhaustive tests below and must not be re-derived.

use crate::grid::GridBin;
use topology::{
    BarrelLocation, DefectMask, ForwardLocation, ModuleLocation, BARREL_LADDER_COUNTS,
    FORWARD_BLADE_COUNTS,
};

/// Map one module's defect mask to bin coordinates in its region's grid.
///
/// Pure and deterministic; emits exactly one bin per set mask bit. The
/// caller pairs the result with `location.region()` to pick the grid.
/// The location must satisfy [`ModuleLocation::validate`], which every
/// [`topology::TopologyLookup`] resolution guarantees; layer and ring
/// numbers index the layout count tables directly.
pub fn map_module(location: &ModuleLocation, mask: DefectMask) -> Vec<GridBin> {
    match location {
        ModuleLocation::Barrel(barrel) => map_barrel(barrel, mask),
        ModuleLocation::Forward(forward) => map_forward(forward, mask),
    }
}

/// Map the 8 x 2 footprint given its lower-left corner and orientation.
fn expand_footprint(
    mask: DefectMask,
    start_x: i32,
    start_y: i32,
    reversed: bool,
    flipped: bool,
) -> Vec<GridBin> {
    mask.set_bits()
        .map(|idx| {
            let (col, row) = if idx < 8 {
                (idx as i32, 0)
            } else {
                (15 - idx as i32, 1)
            };
            let col = if reversed { 7 - col } else { col };
            let row = if flipped { 1 - row } else { row };
            GridBin {
                x: start_x + col,
                y: start_y + row,
            }
        })
        .collect()
}

fn map_barrel(barrel: &BarrelLocation, mask: DefectMask) -> Vec<GridBin> {
    let nlad = BARREL_LADDER_COUNTS[(barrel.layer as usize) - 1];

    // Module slots run -4..4 along x, ladder slots -nlad..nlad along y;
    // the zero slot of each axis stays empty.
    let slot_x = if barrel.module > 0 {
        barrel.module + 4
    } else {
        4 - barrel.module.abs()
    };
    let slot_y = if barrel.ladder > 0 {
        barrel.ladder + nlad
    } else {
        nlad - barrel.ladder.abs()
    };

    let reversed =
        (barrel.layer == 1 && barrel.module > 0) || (barrel.layer > 1 && barrel.module < 0);
    let flipped = if barrel.layer > 1 && barrel.module < 0 {
        !barrel.outer_ladder
    } else {
        barrel.outer_ladder
    };

    expand_footprint(mask, slot_x * 8, slot_y * 2, reversed, flipped)
}

fn map_forward(forward: &ForwardLocation, mask: DefectMask) -> Vec<GridBin> {
    let nblade = FORWARD_BLADE_COUNTS[(forward.ring as usize) - 1];

    // Disk slots run -3..3 along x; each blade slot is four rows tall,
    // two per panel.
    let slot_x = if forward.disk > 0 {
        forward.disk + 3
    } else {
        3 - forward.disk.abs()
    };
    let slot_y = if forward.blade > 0 {
        forward.blade + nblade
    } else {
        nblade - forward.blade.abs()
    };
    let start_y = slot_y * 4 + 2 * (forward.panel as i32 - 1);

    let reversed = forward.disk > 0;
    let flipped = if forward.disk > 0 {
        forward.panel == 1
    } else {
        forward.panel == 2
    };

    expand_footprint(mask, slot_x * 8, start_y, reversed, flipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use topology::Region;

    fn barrel(layer: u8, ladder: i32, module: i32, outer_ladder: bool) -> ModuleLocation {
        ModuleLocation::Barrel(BarrelLocation {
            layer,
            ladder,
            module,
            outer_ladder,
        })
    }

    fn forward(ring: u8, blade: i32, panel: u8, disk: i32) -> ModuleLocation {
        ModuleLocation::Forward(ForwardLocation {
            ring,
            blade,
            panel,
            disk,
        })
    }

    fn assert_in_region(bins: &[GridBin], region: Region) {
        let (nx, ny) = region.bin_shape();
        for bin in bins {
            assert!(
                bin.x >= 0 && (bin.x as usize) < nx && bin.y >= 0 && (bin.y as usize) < ny,
                "bin ({}, {}) outside {region} grid {nx}x{ny}",
                bin.x,
                bin.y
            );
        }
    }

    #[test]
    fn test_one_bin_per_set_bit_no_collisions() {
        let location = barrel(2, 5, 3, false);
        for mask in [0x0001u16, 0x8001, 0x00ff, 0xff00, 0xffff] {
            let bins = map_module(&location, DefectMask(mask));
            assert_eq!(bins.len(), mask.count_ones() as usize);
            let distinct: HashSet<_> = bins.iter().collect();
            assert_eq!(distinct.len(), bins.len(), "collision for mask {mask:#06x}");
        }
    }

    #[test]
    fn test_empty_mask_maps_to_nothing() {
        assert!(map_module(&barrel(1, 1, 1, false), DefectMask::empty()).is_empty());
        assert!(map_module(&forward(1, 1, 1, 1), DefectMask::empty()).is_empty());
    }

    #[test]
    fn test_barrel_full_mask_covers_footprint() {
        // 16 chips tile the whole 8x2 footprint exactly once.
        let bins = map_module(&barrel(3, -10, -2, true), DefectMask(0xffff));
        let xs: HashSet<_> = bins.iter().map(|b| b.x).collect();
        let ys: HashSet<_> = bins.iter().map(|b| b.y).collect();
        assert_eq!(bins.len(), 16);
        assert_eq!(xs.len(), 8);
        assert_eq!(ys.len(), 2);
        let min_x = *xs.iter().min().unwrap();
        assert!(xs.contains(&(min_x + 7)));
    }

    #[test]
    fn test_barrel_known_coordinates() {
        // Layer 1, module +1, ladder +1, not flipped: columns reversed, so
        // bit 0 lands on the right edge of the footprint, bottom row.
        let bins = map_module(&barrel(1, 1, 1, false), DefectMask(0x0001));
        // slot_x = 5, slot_y = 7 (nlad = 6)
        assert_eq!(bins, vec![GridBin { x: 40 + 7, y: 14 }]);

        // Same module, bit 8 sits directly above bit 7 (serpentine).
        let bins7 = map_module(&barrel(1, 1, 1, false), DefectMask(1 << 7));
        let bins8 = map_module(&barrel(1, 1, 1, false), DefectMask(1 << 8));
        assert_eq!(bins7[0].x, bins8[0].x);
        assert_eq!(bins8[0].y, bins7[0].y + 1);

        // Negative module on layer 1: columns run forward.
        let bins = map_module(&barrel(1, -6, -4, false), DefectMask(0x0001));
        // slot_x = 0, slot_y = 0
        assert_eq!(bins, vec![GridBin { x: 0, y: 0 }]);
    }

    #[test]
    fn test_barrel_flip_rules() {
        // Outer-ladder hint flips directly on layer 1.
        let plain = map_module(&barrel(1, 2, 2, false), DefectMask(0x0001));
        let flipped = map_module(&barrel(1, 2, 2, true), DefectMask(0x0001));
        assert_eq!(flipped[0].x, plain[0].x);
        assert_eq!(flipped[0].y, plain[0].y + 1);

        // On layer > 1 with module < 0 the hint is inverted, so
        // outer_ladder = true behaves as not flipped.
        let inverted = map_module(&barrel(2, 2, -2, true), DefectMask(0x0001));
        let direct = map_module(&barrel(2, 2, -2, false), DefectMask(0x0001));
        assert_eq!(direct[0].y, inverted[0].y + 1);
    }

    #[test]
    fn test_flip_mirrors_footprint_rows() {
        // Toggling flip maps the bin set to its mirror about the footprint
        // midline: same columns, rows exchanged.
        for mask in [0x0001u16, 0x0180, 0xa5a5, 0xffff] {
            let plain = map_module(&barrel(1, -3, 2, false), DefectMask(mask));
            let flipped = map_module(&barrel(1, -3, 2, true), DefectMask(mask));
            let min_y = plain.iter().map(|b| b.y).min().unwrap() & !1;
            let mirrored: HashSet<_> = plain
                .iter()
                .map(|b| GridBin {
                    x: b.x,
                    y: min_y + 1 - (b.y - min_y),
                })
                .collect();
            let flipped: HashSet<_> = flipped.into_iter().collect();
            assert_eq!(flipped, mirrored, "mask {mask:#06x}");
        }
    }

    #[test]
    fn test_forward_flip_rules() {
        // Positive disk: panel 1 flipped, panel 2 not.
        let p1 = map_module(&forward(1, 3, 1, 2), DefectMask(0x0001));
        let p2 = map_module(&forward(1, 3, 2, 2), DefectMask(0x0001));
        // Panel rows: panel 1 occupies the lower pair, panel 2 the upper.
        assert_eq!(p2[0].y, p1[0].y + 1);

        // Negative disk: panel 2 flipped instead.
        let p1 = map_module(&forward(1, 3, 1, -2), DefectMask(0x0001));
        let p2 = map_module(&forward(1, 3, 2, -2), DefectMask(0x0001));
        assert_eq!(p2[0].y, p1[0].y + 3);
    }

    #[test]
    fn test_forward_known_coordinates() {
        // Ring 1, blade -11, panel 1, disk -3: everything at the origin
        // corner, columns forward, not flipped.
        let bins = map_module(&forward(1, -11, 1, -3), DefectMask(0x0001));
        assert_eq!(bins, vec![GridBin { x: 0, y: 0 }]);

        // Ring 2, blade +17, panel 2, disk +3: far corner.
        let bins = map_module(&forward(2, 17, 2, 3), DefectMask(1 << 8));
        // slot_x = 6, slot_y = 34, panel 2 offset 2, not flipped (panel 2,
        // disk > 0), reversed: bit 8 -> col 7 -> 7 - 7 = 0, row 1.
        assert_eq!(bins, vec![GridBin { x: 48, y: 34 * 4 + 2 + 1 }]);
    }

    #[test]
    fn test_barrel_exhaustive_range() {
        // Every valid (layer, ladder, module, hint) stays inside its
        // layer's grid for a fully flagged module.
        for layer in 1..=4u8 {
            let nlad = BARREL_LADDER_COUNTS[(layer as usize) - 1];
            let region = Region::BarrelLayer(layer);
            for ladder in (-nlad..=nlad).filter(|&l| l != 0) {
                for module in (-4..=4).filter(|&m| m != 0) {
                    for outer_ladder in [false, true] {
                        let bins = map_module(
                            &barrel(layer, ladder, module, outer_ladder),
                            DefectMask(0xffff),
                        );
                        assert_eq!(bins.len(), 16);
                        assert_in_region(&bins, region);
                    }
                }
            }
        }
    }

    #[test]
    fn test_forward_exhaustive_range() {
        for ring in 1..=2u8 {
            let nblade = FORWARD_BLADE_COUNTS[(ring as usize) - 1];
            let region = Region::ForwardRing(ring);
            for blade in (-nblade..=nblade).filter(|&b| b != 0) {
                for panel in 1..=2u8 {
                    for disk in (-3..=3).filter(|&d| d != 0) {
                        let bins =
                            map_module(&forward(ring, blade, panel, disk), DefectMask(0xffff));
                        assert_eq!(bins.len(), 16);
                        assert_in_region(&bins, region);
                    }
                }
            }
        }
    }

    #[test]
    fn test_modules_do_not_overlap() {
        // Two adjacent barrel modules on the same ladder occupy disjoint
        // footprints.
        let a: HashSet<_> = map_module(&barrel(2, 4, 1, false), DefectMask(0xffff))
            .into_iter()
            .collect();
        let b: HashSet<_> = map_module(&barrel(2, 4, 2, false), DefectMask(0xffff))
            .into_iter()
            .collect();
        assert!(a.is_disjoint(&b));

        // Two panels of one forward blade are disjoint as well.
        let p1: HashSet<_> = map_module(&forward(2, 8, 1, 1), DefectMask(0xffff))
            .into_iter()
            .collect();
        let p2: HashSet<_> = map_module(&forward(2, 8, 2, 1), DefectMask(0xffff))
            .into_iter()
            .collect();
        assert!(p1.is_disjoint(&p2));
    }
}
