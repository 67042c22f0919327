//! Entitlement resolution module

pub mod limits;
pub mod resolver;
pub mod tier;

pub use limits::*;
pub use resolver::*;
pub use tier::*;
