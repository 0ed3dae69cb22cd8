//! Simulation Systems
//!
//! Influence queries and the per-tick cascade.

pub mod cascade;
pub mod influence;

pub use cascade::{commit_plan, plan_tick, CascadePlan, PlannedChange};
pub use influence::{similarity, status_pressure, InfluenceBreakdown, InfluenceModel};
