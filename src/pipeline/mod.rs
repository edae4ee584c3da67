//! Aggregation pipeline: turns the filtered accident table into the
//! chart-ready tables and KPI series behind each dashboard view.

pub mod kpi;
pub mod map;
pub mod monthly;
pub mod types;
pub mod yearly;
