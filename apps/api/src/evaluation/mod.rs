// Resume evaluation: model output repair, reconciliation and the upload endpoint.
// All LLM calls go through llm_client; no direct HTTP calls here.
// repair, coerce and reconcile are pure; only analyzer and handlers touch I/O.

pub mod analyzer;
pub mod coerce;
pub mod handlers;
pub mod model;
pub mod prompts;
pub mod reconcile;
pub mod repair;
