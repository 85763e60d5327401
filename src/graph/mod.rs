mod arena;
mod factor;
mod moments;
mod variable;

pub use arena::*;
pub use factor::*;
pub use moments::*;
pub use variable::*;
