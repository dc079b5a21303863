//! Concrete seed steps, grouped by the data they write.

pub mod demo;
pub mod identity;
pub mod reference;
pub mod shared;
