//! Domain logic for outpost: weekly plan generation, stats reduction,
//! duplicate/CRM matching, imports, and bulk operations.
//!
//! Everything under [`schedule`] and [`matching`] is pure; the service
//! modules glue the pure logic to the database layer.

pub mod bulk;
pub mod import;
pub mod matching;
pub mod plan_service;
pub mod schedule;
