// Script Generation Engine
// Implements: seeded prompt variation, LLM generation, fallback expansion, metrics.
// All LLM calls go through llm_client; no direct Anthropic SDK calls here.

pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod metrics;
pub mod prompts;
pub mod template;
pub mod variation;
