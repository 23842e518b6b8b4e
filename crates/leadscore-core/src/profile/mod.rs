//! Offer and lead profiles.
//!
//! Profiles are structured data validated against JSON Schema before they
//! reach the scoring rules. This module handles parsing YAML/JSON documents
//! and validating them.

mod parser;
mod schema;

pub use parser::{LeadBatch, LeadField, LeadProfile, OfferProfile, ProfileError, RejectedLead};
