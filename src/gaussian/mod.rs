mod distribution;
mod gaussian;

pub use distribution::*;
pub use gaussian::*;
