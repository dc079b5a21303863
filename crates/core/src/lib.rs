//! Core seeding and feature-flag logic for CMIS.
//!
//! This crate contains pure logic with ZERO web or database dependencies.
//! Seed plans, identifiers, catalogs and flag rules live here; `cmis-db`
//! executes them.
//!
//! # Modules
//!
//! - `identity` - Deterministic identifiers for seeded entities
//! - `seeding` - Entity dependency graph, seed plans and run reports
//! - `catalog` - Static reference, identity and demo data
//! - `feature_flag` - Flag resolution, dependency gating and caching
//! - `auth` - Password hashing for seeded users

pub mod auth;
pub mod catalog;
pub mod feature_flag;
pub mod identity;
pub mod seeding;
