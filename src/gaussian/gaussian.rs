use crate::Arbitrary;
use crate::Mu;
use crate::Precision;
use crate::PrecisionMean;
use crate::Sigma;

/// A univariate normal distribution in natural-parameter form: precision `pi`
/// and precision-mean `tau`. All algebra is exact in these parameters; the
/// `(mu, sigma)` view is derived, never stored. `pi == 0.0` represents the
/// improper flat prior (no information).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    pi: Precision,
    tau: PrecisionMean,
}

impl Gaussian {
    /// the flat, uninformative prior: pi = 0, tau = 0.
    pub const FLAT: Gaussian = Gaussian { pi: 0.0, tau: 0.0 };

    pub fn new(pi: Precision, tau: PrecisionMean) -> Self {
        debug_assert!(pi >= 0.0, "precision must be non-negative, got {pi}");
        Self { pi, tau }
    }

    /// construct from the (mu, sigma) view. requires sigma > 0.
    pub fn from_mu_sigma(mu: Mu, sigma: Sigma) -> Self {
        debug_assert!(sigma > 0.0, "sigma must be positive, got {sigma}");
        let pi = 1.0 / (sigma * sigma);
        let tau = pi * mu;
        Self { pi, tau }
    }

    pub fn pi(&self) -> Precision {
        self.pi
    }

    pub fn tau(&self) -> PrecisionMean {
        self.tau
    }

    /// pure view: (mu, sigma), or (0, +inf) when pi == 0 (the flat prior).
    pub fn mu_sigma(&self) -> (Mu, Sigma) {
        if self.pi <= 0.0 {
            (0.0, Sigma::INFINITY)
        } else {
            (self.tau / self.pi, (1.0 / self.pi).sqrt())
        }
    }

    pub fn mu(&self) -> Mu {
        self.mu_sigma().0
    }

    pub fn sigma(&self) -> Sigma {
        self.mu_sigma().1
    }

    /// combines evidence: product of two Gaussians in natural parameters.
    pub fn mul(&self, other: &Gaussian) -> Gaussian {
        Gaussian::new(self.pi + other.pi, self.tau + other.tau)
    }

    /// removes evidence: quotient of two Gaussians. the result's pi may be
    /// non-positive; callers that require a proper distribution must check.
    pub fn div(&self, other: &Gaussian) -> Gaussian {
        Gaussian {
            pi: self.pi - other.pi,
            tau: self.tau - other.tau,
        }
    }

    /// sum of two independent normal variates. requires both operands proper (pi > 0).
    pub fn add(&self, other: &Gaussian) -> Gaussian {
        let (mu_a, sigma_a) = self.mu_sigma();
        let (mu_b, sigma_b) = other.mu_sigma();
        Gaussian::from_mu_sigma(mu_a + mu_b, (sigma_a * sigma_a + sigma_b * sigma_b).sqrt())
    }

    /// difference of two independent normal variates. requires both operands proper (pi > 0).
    pub fn sub(&self, other: &Gaussian) -> Gaussian {
        let (mu_a, sigma_a) = self.mu_sigma();
        let (mu_b, sigma_b) = other.mu_sigma();
        Gaussian::from_mu_sigma(mu_a - mu_b, (sigma_a * sigma_a + sigma_b * sigma_b).sqrt())
    }

    pub fn is_proper(&self) -> bool {
        self.pi > 0.0
    }
}

impl Default for Gaussian {
    fn default() -> Self {
        Self::FLAT
    }
}

impl std::fmt::Display for Gaussian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (mu, sigma) = self.mu_sigma();
        write!(f, "N(mu={:.4}, sigma={:.4})", mu, sigma)
    }
}

impl Arbitrary for Gaussian {
    fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        let mu = rng.random_range(-50.0..50.0);
        let sigma = rng.random_range(0.1..25.0);
        Gaussian::from_mu_sigma(mu, sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_by_flat_is_identity() {
        let a = Gaussian::from_mu_sigma(25.0, 25.0 / 3.0);
        let b = a.mul(&Gaussian::FLAT);
        assert_eq!(a, b);
    }

    #[test]
    fn div_by_self_is_flat() {
        let a = Gaussian::from_mu_sigma(10.0, 2.0);
        let b = a.div(&a);
        assert_eq!(b, Gaussian::FLAT);
    }

    #[test]
    fn mu_sigma_round_trips() {
        let (mu, sigma) = (12.5, 3.25);
        let g = Gaussian::from_mu_sigma(mu, sigma);
        let (mu2, sigma2) = g.mu_sigma();
        assert!((mu - mu2).abs() < 1e-12);
        assert!((sigma - sigma2).abs() < 1e-12);
    }

    #[test]
    fn flat_prior_view_is_zero_infinity() {
        let (mu, sigma) = Gaussian::FLAT.mu_sigma();
        assert_eq!(mu, 0.0);
        assert!(sigma.is_infinite());
    }

    #[test]
    fn add_sums_variances() {
        let a = Gaussian::from_mu_sigma(10.0, 3.0);
        let b = Gaussian::from_mu_sigma(5.0, 4.0);
        let c = a.add(&b);
        assert!((c.mu() - 15.0).abs() < 1e-9);
        assert!((c.sigma() - 5.0).abs() < 1e-9); // 3-4-5 triangle
    }

    #[test]
    fn sub_is_add_of_negation() {
        let a = Gaussian::from_mu_sigma(10.0, 3.0);
        let b = Gaussian::from_mu_sigma(5.0, 4.0);
        let c = a.sub(&b);
        assert!((c.mu() - 5.0).abs() < 1e-9);
        assert!((c.sigma() - 5.0).abs() < 1e-9);
    }
}
