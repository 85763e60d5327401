use crate::Arbitrary;
use serde::Deserialize;
use serde::Serialize;

/// durable skill-record format: `mu`/`sigma` are the Gaussian
/// skill view, `gamma` is the per-game additive uncertainty inflation
/// applied before each match, and `floor`/`ceil` are a 3-sigma confidence
/// band derived from `mu`/`sigma`. readers of a durable copy should treat
/// `floor`/`ceil` as advisory and recompute them rather than trust the
/// stored values verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub mu: f64,
    pub sigma: f64,
    pub gamma: f64,
    pub floor: f64,
    pub ceil: f64,
}

impl SkillRecord {
    pub fn new(mu: f64, sigma: f64, gamma: f64) -> Self {
        let mut record = Self {
            mu,
            sigma,
            gamma,
            floor: 0.0,
            ceil: 0.0,
        };
        record.recompute_bounds();
        record
    }

    pub fn recompute_bounds(&mut self) {
        self.floor = self.mu - 3.0 * self.sigma;
        self.ceil = self.mu + 3.0 * self.sigma;
    }
}

impl Arbitrary for SkillRecord {
    fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        let mu = rng.random_range(-10.0..60.0);
        let sigma = rng.random_range(0.5..25.0);
        let gamma = rng.random_range(0.0..1.0);
        Self::new(mu, sigma, gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_three_sigma_band() {
        let r = SkillRecord::new(25.0, 25.0 / 3.0, 0.0);
        assert!((r.floor - (25.0 - 3.0 * 25.0 / 3.0)).abs() < 1e-12);
        assert!((r.ceil - (25.0 + 3.0 * 25.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn recompute_bounds_tracks_mutation() {
        let mut r = SkillRecord::new(25.0, 25.0 / 3.0, 0.0);
        r.mu = 30.0;
        r.sigma = 5.0;
        r.recompute_bounds();
        assert_eq!(r.floor, 30.0 - 15.0);
        assert_eq!(r.ceil, 30.0 + 15.0);
    }
}
