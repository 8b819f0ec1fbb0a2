//! Type definitions

pub mod employee;
pub mod upload;

pub use employee::*;
pub use upload::*;
