// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt that enforces JSON-only output from the evaluator model.
pub const JSON_ONLY_SYSTEM: &str = "You are an expert resume evaluator. Output ONLY valid JSON.";
