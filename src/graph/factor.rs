use super::Arena;
use super::Edge;
use super::VarId;
use super::v_draw;
use super::v_win;
use super::w_draw;
use super::w_win;
use crate::gaussian::Gaussian;

/// `Prior(v, param)`: clamps `v`'s marginal to `param` outright.
pub struct Prior {
    edge: Edge,
    param: Gaussian,
}

impl Prior {
    pub fn new(arena: &mut Arena, var: VarId, param: Gaussian) -> Self {
        let edge = arena.attach(var);
        Self { edge, param }
    }

    /// idempotent: calling this more than once with the same param leaves
    /// the variable's marginal unchanged.
    pub fn start(&self, arena: &mut Arena) {
        arena.update_value(self.edge, self.param);
    }
}

/// `Likelihood(mean_var, value_var, variance)`: enforces `value ~ N(mean, variance)`.
pub struct Likelihood {
    mean: Edge,
    value: Edge,
    variance: f64,
}

impl Likelihood {
    pub fn new(arena: &mut Arena, mean_var: VarId, value_var: VarId, variance: f64) -> Self {
        debug_assert!(variance > 0.0, "likelihood variance must be positive");
        let mean = arena.attach(mean_var);
        let value = arena.attach(value_var);
        Self {
            mean,
            value,
            variance,
        }
    }

    /// mean -> value direction. precondition: `y.pi > fy.pi` (the mean
    /// variable carries information beyond this factor); when this fails the
    /// update is a no-op and the caller is left with its prior message.
    pub fn update_value(&self, arena: &mut Arena) {
        self.propagate(arena, self.mean, self.value);
    }

    /// value -> mean direction, the mirror of [`Likelihood::update_value`].
    pub fn update_mean(&self, arena: &mut Arena) {
        self.propagate(arena, self.value, self.mean);
    }

    fn propagate(&self, arena: &mut Arena, from: Edge, to: Edge) {
        let y = arena.value(from.var);
        let fy = arena.get_message(from);
        let denom_pi = y.pi() - fy.pi();
        let denom_tau = y.tau() - fy.tau();
        if denom_pi <= 0.0 {
            log::warn!("likelihood update skipped: non-positive precision delta");
            return;
        }
        let a = 1.0 / (1.0 + self.variance * denom_pi);
        let message = Gaussian::new(a * denom_pi, a * denom_tau);
        arena.update_message(to, message);
    }
}

/// `Sum(sum_var, term_vars[], coeffs[])`: enforces `sum = sum_i coeffs[i] * term[i]`.
pub struct Sum {
    sum: Edge,
    terms: Vec<Edge>,
    coeffs: Vec<f64>,
}

impl Sum {
    pub fn new(arena: &mut Arena, sum_var: VarId, term_vars: &[VarId], coeffs: Vec<f64>) -> Self {
        assert_eq!(
            term_vars.len(),
            coeffs.len(),
            "sum factor requires one coefficient per term"
        );
        let sum = arena.attach(sum_var);
        let terms = term_vars.iter().map(|&v| arena.attach(v)).collect();
        Self { sum, terms, coeffs }
    }

    /// computes `sum` from the terms' current marginals.
    pub fn update_sum(&self, arena: &mut Arena) {
        let message = Self::combine(arena, &self.terms, &self.coeffs);
        if let Some(message) = message {
            arena.update_message(self.sum, message);
        }
    }

    /// pushes a corrected `sum` back into term `k`, by rebuilding the
    /// coefficient vector with the k-th term isolated: `a'[j != k] =
    /// -coeffs[j]/coeffs[k]`, `a'[k] = 1/coeffs[k]`, and the variable list
    /// with `term[k]` replaced by `sum_var`.
    pub fn update_term(&self, arena: &mut Arena, k: usize) {
        let ck = self.coeffs[k];
        assert!(ck != 0.0, "sum factor term update requires a nonzero coefficient");
        let mut edges = self.terms.clone();
        edges[k] = self.sum;
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .map(|(j, &cj)| if j == k { 1.0 / ck } else { -cj / ck })
            .collect::<Vec<_>>();
        let message = Self::combine(arena, &edges, &coeffs);
        if let Some(message) = message {
            arena.update_message(self.terms[k], message);
        }
    }

    fn combine(arena: &Arena, edges: &[Edge], coeffs: &[f64]) -> Option<Gaussian> {
        let mut inv_pi_sum = 0.0;
        let mut ratio_sum = 0.0;
        for (edge, &a) in edges.iter().zip(coeffs) {
            let y = arena.value(edge.var);
            let fy = arena.get_message(*edge);
            let denom = y.pi() - fy.pi();
            if denom <= 0.0 {
                log::warn!("sum update skipped: non-positive precision delta on a term");
                return None;
            }
            inv_pi_sum += a * a / denom;
            ratio_sum += a * (y.tau() - fy.tau()) / denom;
        }
        if inv_pi_sum <= 0.0 {
            return None;
        }
        let pi_star = 1.0 / inv_pi_sum;
        let tau_star = pi_star * ratio_sum;
        Some(Gaussian::new(pi_star, tau_star))
    }
}

/// `Truncate(var, V, W, epsilon)`: approximates truncation of `var` by a
/// rank-difference inequality, via closed-form moment-matching functions and
/// a draw margin `epsilon`.
pub struct Truncate {
    edge: Edge,
    epsilon: f64,
    draw: bool,
}

impl Truncate {
    pub fn new(arena: &mut Arena, var: VarId, epsilon: f64, draw: bool) -> Self {
        let edge = arena.attach(var);
        Self { edge, epsilon, draw }
    }

    /// preconditions: `c > 0` and `W* < 1`; on failure the update is skipped
    /// (a degenerate observation) and the variable is left unchanged.
    pub fn update(&self, arena: &mut Arena) {
        let x = arena.value(self.edge.var);
        let fx = arena.get_message(self.edge);
        let c = x.pi() - fx.pi();
        if c <= 0.0 {
            log::warn!("truncation update skipped: non-positive precision delta");
            return;
        }
        let d = x.tau() - fx.tau();
        let s = c.sqrt();
        let t = d / s;
        let e = self.epsilon * s;
        let (v, w) = if self.draw {
            (v_draw(t, e), w_draw(t, e))
        } else {
            (v_win(t, e), w_win(t, e))
        };
        if !(w < 1.0) {
            log::warn!("truncation update skipped: W* >= 1 (degenerate observation)");
            return;
        }
        let pi = c / (1.0 - w);
        let tau = (d + s * v) / (1.0 - w);
        arena.update_value(self.edge, Gaussian::new(pi, tau));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prior_start_is_idempotent() {
        let mut arena = Arena::new();
        let v = arena.create();
        let param = Gaussian::from_mu_sigma(25.0, 25.0 / 3.0);
        let prior = Prior::new(&mut arena, v, param);
        prior.start(&mut arena);
        let first = arena.value(v);
        prior.start(&mut arena);
        assert_eq!(arena.value(v), first);
        assert_eq!(first, param);
    }

    #[test]
    fn likelihood_propagates_mean_to_value() {
        let mut arena = Arena::new();
        let mean = arena.create();
        let value = arena.create();
        let prior = Prior::new(&mut arena, mean, Gaussian::from_mu_sigma(25.0, 25.0 / 3.0));
        let likelihood = Likelihood::new(&mut arena, mean, value, (25.0 / 6.0) * (25.0 / 6.0));
        prior.start(&mut arena);
        likelihood.update_value(&mut arena);
        assert!(arena.value(value).is_proper());
    }

    #[test]
    fn sum_combines_terms() {
        let mut arena = Arena::new();
        let t0 = arena.create();
        let t1 = arena.create();
        let sum_var = arena.create();
        let p0 = Prior::new(&mut arena, t0, Gaussian::from_mu_sigma(10.0, 2.0));
        let p1 = Prior::new(&mut arena, t1, Gaussian::from_mu_sigma(5.0, 3.0));
        p0.start(&mut arena);
        p1.start(&mut arena);
        let sum = Sum::new(&mut arena, sum_var, &[t0, t1], vec![1.0, 1.0]);
        sum.update_sum(&mut arena);
        let (mu, _) = arena.value(sum_var).mu_sigma();
        assert!((mu - 15.0).abs() < 1e-6);
    }
}
