//! Bit splicing for hypercube vertex indices
//!
//! A vertex of the D-cube is identified by a D-bit index whose bit `k` is the
//! sign of coordinate `k`. Edges and faces are enumerated by a *reduced* index
//! that omits the bits of the axes they span; the full vertex index is recovered
//! by inserting those bits back at their axis positions.

/// Insert `bit` at `position` into `value`.
///
/// Bits of `value` below `position` keep their place, bits at or above
/// `position` move up by one.
///
/// ```
/// use juxtapos_math::insert_bit;
/// assert_eq!(insert_bit(0b101, 1, true), 0b1011);
/// assert_eq!(insert_bit(0b101, 1, false), 0b1001);
/// ```
///
/// # Panics
/// If `position >= 32`.
#[inline]
pub fn insert_bit(value: u32, position: u32, bit: bool) -> u32 {
    assert!(position < u32::BITS, "bit position {} out of range", position);

    let low_mask = (1u32 << position) - 1;
    let low = value & low_mask;
    let high = (value & !low_mask) << 1;

    high | (u32::from(bit) << position) | low
}

/// Insert two bits at positions `lo < hi`, the positions being those of the
/// final index.
///
/// `lo` is inserted first so that `hi` addresses the already widened value.
#[inline]
pub fn insert_bit_pair(value: u32, lo: u32, lo_bit: bool, hi: u32, hi_bit: bool) -> u32 {
    debug_assert!(lo < hi);
    insert_bit(insert_bit(value, lo, lo_bit), hi, hi_bit)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mask formulation of the face corner index (low bits, middle bits
    /// shifted once, high bits shifted twice).
    fn spliced_by_masks(k: u32, i: u32, j: u32, bi: u32, bj: u32) -> u32 {
        let from = |x: u32, n: u32| x & (!0u32 << n);
        let to = |x: u32, n: u32| x & !(!0u32 << n);
        to(k, i) | to(from(k, i) << 1, j) | from(k << 1, j) << 1 | bi << i | bj << j
    }

    #[test]
    fn test_insert_at_zero() {
        assert_eq!(insert_bit(0b0, 0, false), 0b0);
        assert_eq!(insert_bit(0b0, 0, true), 0b1);
        assert_eq!(insert_bit(0b11, 0, false), 0b110);
        assert_eq!(insert_bit(0b11, 0, true), 0b111);
    }

    #[test]
    fn test_insert_keeps_low_bits() {
        // bits below the position stay put
        for value in 0..64u32 {
            for position in 0..6 {
                let low_mask = (1 << position) - 1;
                let result = insert_bit(value, position, false);
                assert_eq!(result & low_mask, value & low_mask);
            }
        }
    }

    #[test]
    fn test_insert_shifts_high_bits() {
        for value in 0..64u32 {
            for position in 0..6 {
                let result = insert_bit(value, position, true);
                assert_eq!(result >> (position + 1), value >> position);
                assert_eq!((result >> position) & 1, 1);
            }
        }
    }

    #[test]
    fn test_insert_top_position() {
        assert_eq!(insert_bit(0, 31, true), 1 << 31);
        assert_eq!(insert_bit(0x7fff_ffff, 31, false), 0x7fff_ffff);
    }

    #[test]
    #[should_panic]
    fn test_insert_position_out_of_range() {
        insert_bit(0, 32, true);
    }

    #[test]
    fn test_removing_inserted_bit_roundtrips() {
        // clearing the inserted bit and closing the gap gives back the input
        for value in 0..128u32 {
            for position in 0..7 {
                let widened = insert_bit(value, position, true);
                let low = widened & ((1 << position) - 1);
                let high = (widened >> (position + 1)) << position;
                assert_eq!(high | low, value);
            }
        }
    }

    #[test]
    fn test_pair_matches_mask_formula() {
        for d in 2..8u32 {
            for i in 0..d {
                for j in (i + 1)..d {
                    for k in 0..(1u32 << (d - 2)) {
                        for corner in 0..4u32 {
                            let (bi, bj) = (corner & 1, (corner >> 1) & 1);
                            assert_eq!(
                                insert_bit_pair(k, i, bi == 1, j, bj == 1),
                                spliced_by_masks(k, i, j, bi, bj),
                                "d={} i={} j={} k={} corner={}", d, i, j, k, corner
                            );
                        }
                    }
                }
            }
        }
    }
}
