//! Candidate-template metadata: token parsing and the in-memory store
//! loaded once at engine construction.
pub mod store;
pub mod token;

pub use store::{CandidateTemplate, FirmStats, FirmTemplateUsage, TemplateClass, TemplateStore};
pub use token::{NameToken, TemplateToken};
