use crate::DEFAULT_BETA;
use crate::DEFAULT_DRAW_PROBABILITY;
use crate::DEFAULT_GAMMA;
use crate::gaussian::inverse_cdf;
use anyhow::Context;
use anyhow::bail;

/// number of teams a single match-quality draw margin is derived for. the
/// reference two-team draw-margin formula fixes `N = 2`; team matches with
/// more than two teams still use the pairwise adjacent-team truncation layer
/// with this same per-pair epsilon.
const DRAW_MARGIN_TEAM_COUNT: f64 = 2.0;

/// global tuning parameters threaded through the rating update procedure and
/// stored alongside the skill table: performance noise
/// `beta`, draw margin `epsilon`, and the default per-game uncertainty
/// inflation `gamma` handed to skill tables' missing policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub beta: f64,
    pub epsilon: f64,
    pub gamma: f64,
}

impl Parameters {
    pub fn builder() -> ParametersBuilder {
        ParametersBuilder::default()
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::builder()
            .build()
            .expect("default parameters are always valid")
    }
}

/// `epsilon = inverse_cdf((p + 1) / 2) * sqrt(team_count) * beta`.
pub fn epsilon_from_draw_probability(draw_probability: f64, beta: f64, team_count: f64) -> f64 {
    inverse_cdf((draw_probability + 1.0) / 2.0) * team_count.sqrt() * beta
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ParametersBuilder {
    beta: Option<f64>,
    epsilon: Option<f64>,
    draw_probability: Option<f64>,
    gamma: Option<f64>,
}

impl ParametersBuilder {
    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }

    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn draw_probability(mut self, draw_probability: f64) -> Self {
        self.draw_probability = Some(draw_probability);
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    /// specifying both `epsilon` and `draw_probability` is a caller error:
    /// the two are alternate ways of deriving the same value.
    pub fn build(self) -> anyhow::Result<Parameters> {
        if self.epsilon.is_some() && self.draw_probability.is_some() {
            bail!("specify either epsilon or draw_probability, not both");
        }
        let beta = self.beta.unwrap_or(DEFAULT_BETA);
        let epsilon = match (self.epsilon, self.draw_probability) {
            (Some(epsilon), None) => epsilon,
            (None, Some(p)) => epsilon_from_draw_probability(p, beta, DRAW_MARGIN_TEAM_COUNT),
            (None, None) => {
                epsilon_from_draw_probability(DEFAULT_DRAW_PROBABILITY, beta, DRAW_MARGIN_TEAM_COUNT)
            }
            (Some(_), Some(_)) => unreachable!("checked above"),
        };
        let gamma = self.gamma.unwrap_or(DEFAULT_GAMMA);
        (beta > 0.0)
            .then_some(())
            .context("beta must be positive")?;
        (epsilon >= 0.0)
            .then_some(())
            .context("epsilon must be non-negative")?;
        Ok(Parameters { beta, epsilon, gamma })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_match_documented_defaults() {
        let p = Parameters::default();
        assert!((p.beta - DEFAULT_BETA).abs() < 1e-12);
        assert!((p.gamma - DEFAULT_GAMMA).abs() < 1e-12);
        assert!(p.epsilon > 0.0);
    }

    #[test]
    fn specifying_both_epsilon_and_draw_probability_is_an_error() {
        let result = Parameters::builder()
            .epsilon(1.0)
            .draw_probability(0.1)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn explicit_epsilon_is_honored_verbatim() {
        let p = Parameters::builder().epsilon(3.14).build().unwrap();
        assert_eq!(p.epsilon, 3.14);
    }
}
