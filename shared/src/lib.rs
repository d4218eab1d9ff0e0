/// Scribe shared crate: data model, error taxonomy, and transcript
/// text normalization used by the harvester.
pub mod errors;
pub mod models;
pub mod transcript;
