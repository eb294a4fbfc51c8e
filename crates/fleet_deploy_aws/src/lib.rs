//! AWS-oriented adapters and handlers for fleet deployment.
//!
//! This crate owns runtime integration details: the publisher driving the
//! scan/publish/bind flow, the secret-reader handler, and the adapter
//! traits the binaries implement against the AWS SDK. Deterministic domain
//! behavior lives in `crates/fleet_deploy_core`.

pub mod adapters;
pub mod handlers;
