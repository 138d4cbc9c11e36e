// Tactic detection: static catalog, keyword matching, cross-script synthesis,
// format recommendation, and the LLM-backed analysis service.
// The first four are pure and synchronous; only `analysis` performs I/O.

pub mod analysis;
pub mod catalog;
pub mod formats;
pub mod handlers;
pub mod matcher;
pub mod prompts;
pub mod synthesizer;
