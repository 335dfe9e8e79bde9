//! Background work that keeps catalogs current
//!
//! - `lifecycle`: the update-notification bus
//! - `refresh`: initial load plus lifecycle-driven reloads for one catalog
//! - `primer`: ordered directory rescan and local refresh

pub mod lifecycle;
pub mod primer;
pub mod refresh;
