//! Concrete asset categories

pub mod audible;
pub mod visual;
