use super::Edge;
use super::VarId;
use super::Variable;
use crate::gaussian::Gaussian;

/// per-match factor graph arena: variables live in a single slab addressed
/// by index, with a bounded lifetime tied to one rating update. no
/// ownership cycle between variables and factors is possible, since factors
/// only ever hold `Edge`s (indices), never references.
#[derive(Debug, Default)]
pub struct Arena {
    variables: Vec<Variable>,
}

impl Arena {
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
        }
    }

    pub fn create(&mut self) -> VarId {
        self.variables.push(Variable::new());
        VarId(self.variables.len() - 1)
    }

    /// attach a factor edge to `var`. fails (debug-asserts) only if the
    /// caller mismanages indices; in practice each factor attaches exactly
    /// once per incident variable at construction time.
    pub fn attach(&mut self, var: VarId) -> Edge {
        let slot = self.variables[var.0].attach();
        Edge { var, slot }
    }

    pub fn value(&self, var: VarId) -> Gaussian {
        self.variables[var.0].value()
    }

    pub fn get_message(&self, edge: Edge) -> Gaussian {
        self.variables[edge.var.0].get_message(edge.slot)
    }

    pub fn update_message(&mut self, edge: Edge, m: Gaussian) {
        self.variables[edge.var.0].update_message(edge.slot, m);
    }

    pub fn update_value(&mut self, edge: Edge, v: Gaussian) {
        self.variables[edge.var.0].update_value(edge.slot, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_variable_is_flat() {
        let mut arena = Arena::new();
        let v = arena.create();
        assert_eq!(arena.value(v), Gaussian::FLAT);
    }

    #[test]
    fn two_edges_on_same_variable_are_independent_slots() {
        let mut arena = Arena::new();
        let v = arena.create();
        let e0 = arena.attach(v);
        let e1 = arena.attach(v);
        arena.update_message(e0, Gaussian::from_mu_sigma(1.0, 1.0));
        assert_eq!(arena.get_message(e1), Gaussian::FLAT);
    }
}
