use rand::Rng;

/// Draws `sample_count` points uniformly from the unit square and counts how many of them fall
/// inside the quarter of the unit disk that is inscribed in the square.
///
/// Each point consumes two values from the generator: first `x`, then `y`, both in `[0, 1)`.
/// A point on the arc itself (`x² + y² == 1`) counts as a hit.
///
/// The generator is the only state touched; for a given generator state the result is
/// deterministic.
pub fn count_hits<R>(rng: &mut R, sample_count: u64) -> u64
where
    R: Rng + ?Sized,
{
    let mut hits: u64 = 0;

    for _ in 0..sample_count {
        let x: f64 = rng.random();
        let y: f64 = rng.random();

        if x * x + y * y <= 1.0 {
            // Cannot overflow, bounded by `sample_count`.
            hits = hits.wrapping_add(1);
        }
    }

    hits
}

/// Estimates the fraction of the unit square covered by the inscribed quarter circle, which
/// converges to π/4 as `sample_count` grows.
///
/// The result is always in `[0.0, 1.0]`. A `sample_count` of zero yields `0.0` instead of
/// dividing by zero.
///
/// # Examples
///
/// ```
/// use pi_barrier::estimate_hit_ratio;
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let ratio = estimate_hit_ratio(&mut rng, 10_000);
///
/// assert!((0.0..=1.0).contains(&ratio));
/// ```
#[expect(
    clippy::cast_precision_loss,
    reason = "sample counts beyond 2^53 are not a realistic benchmark input"
)]
pub fn estimate_hit_ratio<R>(rng: &mut R, sample_count: u64) -> f64
where
    R: Rng + ?Sized,
{
    if sample_count == 0 {
        return 0.0;
    }

    let hits = count_hits(rng, sample_count);

    hits as f64 / sample_count as f64
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::f64::consts::FRAC_PI_4;

    use rand::rngs::SmallRng;
    use rand::{RngCore, SeedableRng};
    use testing::f64_diff_abs;

    use super::*;

    /// A degenerate generator that returns the same bits forever.
    struct ConstantRng(u64);

    impl RngCore for ConstantRng {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "taking the low half is the point"
        )]
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for (dst, src) in dst.iter_mut().zip(self.0.to_le_bytes().into_iter().cycle()) {
                *dst = src;
            }
        }
    }

    #[test]
    fn ratio_is_within_unit_interval() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);

        for sample_count in [1, 2, 3, 10, 1_000, 50_000] {
            let ratio = estimate_hit_ratio(&mut rng, sample_count);
            assert!(
                (0.0..=1.0).contains(&ratio),
                "ratio {ratio} out of range for {sample_count} samples"
            );
        }
    }

    #[test]
    fn zero_samples_is_zero() {
        let mut rng = SmallRng::seed_from_u64(1);

        assert_eq!(estimate_hit_ratio(&mut rng, 0).to_bits(), 0.0_f64.to_bits());
        assert_eq!(count_hits(&mut rng, 0), 0);
    }

    #[test]
    fn all_zero_stream_hits_every_time() {
        // x = y = 0 is the corner of the square, well inside the quarter circle.
        let mut rng = ConstantRng(0);

        assert_eq!(count_hits(&mut rng, 1_000), 1_000);
        assert_eq!(
            estimate_hit_ratio(&mut rng, 1_000).to_bits(),
            1.0_f64.to_bits()
        );
    }

    #[test]
    fn top_of_range_stream_misses_every_time() {
        // All-ones bits map to the largest f64 below 1.0, so x² + y² is just under 2.
        let mut rng = ConstantRng(u64::MAX);

        assert_eq!(count_hits(&mut rng, 1_000), 0);
        assert_eq!(
            estimate_hit_ratio(&mut rng, 1_000).to_bits(),
            0.0_f64.to_bits()
        );
    }

    #[test]
    fn same_seed_same_ratio() {
        let mut a = SmallRng::seed_from_u64(7);
        let mut b = SmallRng::seed_from_u64(7);

        assert_eq!(
            estimate_hit_ratio(&mut a, 10_000).to_bits(),
            estimate_hit_ratio(&mut b, 10_000).to_bits()
        );
    }

    #[test]
    fn converges_towards_quarter_pi() {
        let mut rng = SmallRng::seed_from_u64(2024);

        let ratio = estimate_hit_ratio(&mut rng, 400_000);

        // Standard deviation at this sample count is ~0.0007.
        #[expect(
            clippy::float_cmp,
            reason = "we use absolute error, which is the right thing to do"
        )]
        {
            assert_eq!(f64_diff_abs(ratio, FRAC_PI_4, 0.01), 0.0);
        }
    }

    #[test]
    fn works_through_dyn_generator() {
        let mut rng = SmallRng::seed_from_u64(3);
        let rng: &mut dyn RngCore = &mut rng;

        let ratio = estimate_hit_ratio(rng, 100);
        assert!((0.0..=1.0).contains(&ratio));
    }
}
