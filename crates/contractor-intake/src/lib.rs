//! Contractor applicant intake: validation, shortlist evaluation, lead publication, and
//! enrichment, plus the configuration and telemetry shared by the API service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
