//! Standard normal pdf/cdf/inverse-cdf, accurate to >= 1e-12 on |x| <= 10.
//! Delegated to `statrs`, whose `Normal` distribution is implemented against
//! high-precision erf/erfc rational approximations.

use statrs::distribution::Continuous;
use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;

fn standard() -> Normal {
    Normal::new(0.0, 1.0).expect("standard normal parameters are always valid")
}

/// standard normal probability density function.
pub fn pdf(x: f64) -> f64 {
    standard().pdf(x)
}

/// standard normal cumulative distribution function.
pub fn cdf(x: f64) -> f64 {
    standard().cdf(x)
}

/// inverse standard normal cdf (quantile function), `p` in (0, 1).
pub fn inverse_cdf(p: f64) -> f64 {
    standard().inverse_cdf(p)
}
