use crate::gaussian::Gaussian;

/// index of a variable inside an [`Arena`](super::Arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub(super) usize);

/// a message slot on a single variable, identifying which incident factor it
/// belongs to. returned by [`Variable::attach`] in attachment order, so the
/// arena can store messages inline as a fixed-length vector per variable
/// instead of a hash map keyed by factor identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub var: VarId,
    pub(super) slot: usize,
}

/// mutable container holding a marginal Gaussian and, for each incident
/// factor, the message most recently sent into this variable on that edge.
/// invariant: `value` equals the exact product (in natural parameters) of
/// every entry in `messages`.
#[derive(Debug, Clone)]
pub struct Variable {
    value: Gaussian,
    messages: Vec<Gaussian>,
}

impl Variable {
    pub fn new() -> Self {
        Self {
            value: Gaussian::FLAT,
            messages: Vec::new(),
        }
    }

    pub fn value(&self) -> Gaussian {
        self.value
    }

    /// initialize a new message slot to the flat Gaussian; returns its index
    /// in attachment order.
    pub(super) fn attach(&mut self) -> usize {
        let slot = self.messages.len();
        self.messages.push(Gaussian::FLAT);
        slot
    }

    pub(super) fn get_message(&self, slot: usize) -> Gaussian {
        self.messages[slot]
    }

    /// `value <- value / messages[slot] * m; messages[slot] <- m`.
    /// used when a factor communicates a partial update (likelihood, sum).
    pub(super) fn update_message(&mut self, slot: usize, m: Gaussian) {
        self.value = self.value.div(&self.messages[slot]).mul(&m);
        self.messages[slot] = m;
    }

    /// `messages[slot] <- v * messages[slot] / value; value <- v`.
    /// used when a factor writes the whole marginal (prior, truncation).
    pub(super) fn update_value(&mut self, slot: usize, v: Gaussian) {
        self.messages[slot] = v.mul(&self.messages[slot]).div(&self.value);
        self.value = v;
    }
}

impl Default for Variable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_of_messages(v: &Variable) -> Gaussian {
        v.messages
            .iter()
            .fold(Gaussian::FLAT, |acc, m| acc.mul(m))
    }

    #[test]
    fn value_equals_product_of_messages_after_updates() {
        let mut v = Variable::new();
        let s0 = v.attach();
        let s1 = v.attach();
        v.update_message(s0, Gaussian::from_mu_sigma(10.0, 2.0));
        v.update_message(s1, Gaussian::from_mu_sigma(5.0, 3.0));
        assert_eq!(v.value(), product_of_messages(&v));

        v.update_value(s0, Gaussian::from_mu_sigma(8.0, 1.5));
        assert_eq!(v.value(), product_of_messages(&v));
    }

    #[test]
    fn attach_initializes_flat_message() {
        let mut v = Variable::new();
        let slot = v.attach();
        assert_eq!(v.get_message(slot), Gaussian::FLAT);
    }
}
