//! Zonegen Core Library
//!
//! Turns live Route 53 hosted zones into configuration for the
//! `terraform-aws-modules/route53` module family:
//! - Zone model (`model`): classify raw record sets, decode names
//! - Delegation (`delegation`): find parent/child zone pairs
//! - Synthesis (`synth`): per-zone files and outputs
//! - Import planning (`import_plan`): adopt live resources into state
//!
//! [`GeneratorService`] drives a whole run against any
//! [`DnsProvider`](zonegen_provider::DnsProvider).

pub mod delegation;
pub mod error;
pub mod import_plan;
pub mod model;
pub mod services;
pub mod synth;
pub mod types;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use import_plan::{ImportDirective, ImportMode, ImportPlan, ImportPlanner};
pub use services::{GeneratorOptions, GeneratorService, RunIssue, RunSummary};
pub use zonegen_provider::ZoneScope;
