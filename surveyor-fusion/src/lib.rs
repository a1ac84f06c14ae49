//! # surveyor-fusion
//!
//! Turns raw per-source evidence into normalized `(probability, confidence)`
//! pairs and fuses them into a single damage probability with an honest
//! uncertainty estimate.

pub mod engine;
pub mod normalizer;
pub mod uncertainty;
pub mod weights;

pub use engine::FusionEngine;
pub use normalizer::EvidenceNormalizer;
