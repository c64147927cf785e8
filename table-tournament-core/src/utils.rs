pub trait NumExt {
    /// Returns the base 2 logarithm of the number, rounding up to the next integer.
    fn ilog2_ceil(self) -> Self;

    /// Returns `self / 2`, rounding up.
    fn half_ceil(self) -> Self;
}

impl NumExt for usize {
    #[inline]
    fn ilog2_ceil(self) -> Self {
        self.next_power_of_two().trailing_zeros() as Self
    }

    #[inline]
    fn half_ceil(self) -> Self {
        (self + 1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::NumExt;

    #[test]
    fn test_ilog2_ceil() {
        assert_eq!(2_usize.ilog2_ceil(), 1);
        assert_eq!(3_usize.ilog2_ceil(), 2);
        assert_eq!(4_usize.ilog2_ceil(), 2);
        assert_eq!(5_usize.ilog2_ceil(), 3);
        assert_eq!(8_usize.ilog2_ceil(), 3);
        assert_eq!(9_usize.ilog2_ceil(), 4);
        assert_eq!(16_usize.ilog2_ceil(), 4);
        assert_eq!(17_usize.ilog2_ceil(), 5);
        assert_eq!(32_usize.ilog2_ceil(), 5);
    }

    #[test]
    fn test_half_ceil() {
        assert_eq!(1_usize.half_ceil(), 1);
        assert_eq!(2_usize.half_ceil(), 1);
        assert_eq!(3_usize.half_ceil(), 2);
        assert_eq!(4_usize.half_ceil(), 2);
        assert_eq!(5_usize.half_ceil(), 3);
    }
}
