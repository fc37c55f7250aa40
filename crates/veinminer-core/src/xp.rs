use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use veinminer_blocks::XpRange;

/// Source of experience draws.
pub trait XpRoll {
    /// Uniform integer in `[range.min(), range.max()]`.
    fn roll(&mut self, range: XpRange) -> u32;
}

impl<T: XpRoll + ?Sized> XpRoll for &mut T {
    #[inline]
    fn roll(&mut self, range: XpRange) -> u32 {
        (**self).roll(range)
    }
}

pub struct RandomXp<R = StdRng> {
    rng: R,
}

impl RandomXp<StdRng> {
    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl<R: Rng> RandomXp<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> XpRoll for RandomXp<R> {
    fn roll(&mut self, range: XpRange) -> u32 {
        self.rng.random_range(range.min()..=range.max())
    }
}

/// Absent range grants nothing; a constant range never touches the roller.
pub fn experience_for<X: XpRoll + ?Sized>(range: Option<XpRange>, roll: &mut X) -> u32 {
    match range {
        None => 0,
        Some(r) if r.is_constant() => r.min(),
        Some(r) => roll.roll(r),
    }
}
