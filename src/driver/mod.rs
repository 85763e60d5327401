#![cfg(feature = "native")]

mod jsonl;
mod match_record;
mod opening;
mod rating_driver;
mod scanner;

pub use jsonl::*;
pub use match_record::*;
pub use opening::*;
pub use rating_driver::*;
pub use scanner::*;
