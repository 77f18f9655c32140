//! Matches free-text external product names against an internal catalog.
//!
//! Each name goes through [`extractor::AttributeExtractor`] (language model with
//! a keyword fallback) and then [`scorer::MatchScorer`]; [`pipeline::run`] ties
//! the two together.

pub mod config;
pub mod dataset;
pub mod extractor;
pub mod llm;
pub mod model;
pub mod pipeline;
pub mod scorer;
