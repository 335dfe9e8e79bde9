//! Domain types for the Catalog domain

pub mod entities;
pub mod profile;
pub mod state;
