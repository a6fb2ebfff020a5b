//! triage-engine
//!
//! Decision orchestration for emergency triage. Fuses severity classifiers,
//! picks the hospital capability cluster for an incident and ranks hospitals
//! by distance. Classifiers and repositories are collaborators supplied by the
//! caller through the traits in [`classifier`] and [`repository`].

pub mod audit;
pub mod classifier;
pub mod cluster;
pub mod config;
pub mod error;
pub mod fusion;
pub mod geo;
pub mod orchestrator;
pub mod rank;
pub mod repository;

pub use crate::config::EngineConfig;
pub use crate::error::EngineError;
pub use crate::orchestrator::{DecisionOrchestrator, OrchestratorBuilder};
