mod branch;
mod employee;
mod position;

pub use branch::*;
pub use employee::*;
pub use position::*;
