//! Evaluation pipeline: model call → repair → strict parse → reconcile.
//!
//! `analyze_resume` is the fallback boundary. Whatever goes wrong below it,
//! callers always receive a well-shaped `EvaluationResult`.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::evaluation::model::EvaluationResult;
use crate::evaluation::prompts::build_evaluation_prompt;
use crate::evaluation::reconcile::reconcile;
use crate::evaluation::repair::repair;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{ChatModel, LlmError};

/// Lines of repaired text logged on each side of a parse failure.
const CONTEXT_LINES: usize = 3;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("JSON parse failed at line {line}, column {column}: {message}")]
    Unparseable {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Model call failed: {0}")]
    Upstream(#[from] LlmError),
}

/// Turns raw model text into a canonical result, or reports where parsing failed.
pub fn evaluate_model_output(raw: &str) -> Result<EvaluationResult, EvaluationError> {
    debug!("Raw model text:\n{raw}");

    let repaired = repair(raw);
    debug!("Repaired model text:\n{repaired}");

    match serde_json::from_str::<Value>(&repaired) {
        Ok(payload) => {
            debug!("JSON parse succeeded");
            Ok(reconcile(payload))
        }
        Err(e) => {
            warn!(
                line = e.line(),
                column = e.column(),
                "JSON parse failed: {e}\nAround error:\n{}",
                error_context(&repaired, e.line())
            );
            Err(EvaluationError::Unparseable {
                line: e.line(),
                column: e.column(),
                message: e.to_string(),
            })
        }
    }
}

/// Evaluates resume text with the given model. Never fails: errors become the degraded result.
pub async fn analyze_resume(
    model: &dyn ChatModel,
    resume_text: &str,
    pages: usize,
) -> EvaluationResult {
    let evaluation_id = Uuid::new_v4();
    let span = info_span!("evaluation", %evaluation_id, pages);

    async move {
        match request_evaluation(model, resume_text).await {
            Ok(result) => {
                info!(overall_score = result.overall_score, "Evaluation complete");
                result
            }
            Err(e) => {
                error!("Evaluation failed, returning degraded result: {e}");
                EvaluationResult::degraded(e.to_string())
            }
        }
    }
    .instrument(span)
    .await
}

async fn request_evaluation(
    model: &dyn ChatModel,
    resume_text: &str,
) -> Result<EvaluationResult, EvaluationError> {
    let prompt = build_evaluation_prompt(resume_text);
    let raw = model.complete(&prompt, JSON_ONLY_SYSTEM).await?;
    evaluate_model_output(&raw)
}

/// Numbered lines around `line` (1-based), for parse diagnostics.
fn error_context(text: &str, line: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = line.saturating_sub(CONTEXT_LINES);
    let end = (line + CONTEXT_LINES).min(lines.len());
    (start..end)
        .map(|i| format!("{}: {}", i + 1, lines[i]))
        .collect::<Vec<_>>()
        .join("\n")
}
