//! Adaptive interview core: profile, policy, agents and the orchestrator.

pub mod agents;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod policy;
pub mod profile;
pub mod prompts;

#[cfg(test)]
pub(crate) mod testing;
