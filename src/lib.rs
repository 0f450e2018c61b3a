//! rabbitry - lifecycle records for a rabbit farm
//!
//! Keeps rabbits, breedings, litters, terminal events and care records
//! mutually consistent under concurrent writers. Every operation commits
//! its triggering write and all of its cascades atomically, or nothing.

pub mod api;
pub mod cli;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod reporting;
pub mod store;
pub mod validation;
