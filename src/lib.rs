//! Funnel analytics engine for sales outreach.
//!
//! Turns a project's raw contact list and activity log into time-bucketed
//! conversion funnels (daily or monthly) and scalar pipeline rates. The
//! engine is a pure, synchronous transformation: it performs no I/O, never
//! mutates its inputs, and identical inputs always produce bit-identical
//! reports. Fetching, storage, and rendering live with the surrounding
//! application.
//!
//! Pipeline stages, each independently testable:
//! period keying → channel classification → touch grouping → aggregation →
//! metrics → report assembly.

pub mod aggregate;
pub mod cache;
pub mod classify;
pub mod error;
pub mod json_loader;
pub mod metrics;
pub mod period;
pub mod report;
pub mod touches;
pub mod types;

pub use cache::ReportCache;
pub use error::EngineError;
pub use report::{compute, filter_project, FunnelReport, ReportRow};
pub use types::{Activity, Channel, Contact, FunnelSnapshot, Granularity};
