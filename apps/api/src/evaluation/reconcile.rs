//! Reconciliation of a parsed model payload into the canonical `EvaluationResult`.
//!
//! Total over any JSON value: missing fields default to empty, wrongly-shaped
//! list items are coerced to strings, and the overall score is recomputed from
//! the sub-scores whenever any are present.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::evaluation::coerce::{coerce_list, render};
use crate::evaluation::model::{
    CategoryFeedback, EvaluationResult, FeedbackByCategory, SubScores, CATEGORIES,
};

const LIST_FIELDS: [&str; 5] = [
    "strengths",
    "issues",
    "recommendations",
    "bad_bullets",
    "improved_bullets",
];

pub fn reconcile(payload: Value) -> EvaluationResult {
    let mut data = match payload {
        Value::Object(map) => map,
        other => {
            warn!("Model payload is not an object (got {}), treating as empty", kind(&other));
            Map::new()
        }
    };

    if !data.contains_key("subscores") {
        if let Some(scores) = data.remove("scores") {
            data.insert("subscores".to_string(), scores);
        }
    }

    let raw_subscores = data.get("subscores").and_then(Value::as_object);
    let subscores = raw_subscores.map(parse_subscores).unwrap_or_default();
    if raw_subscores.is_some_and(|m| !m.is_empty()) && subscores.is_empty() {
        warn!("Subscores present but no known category had a numeric value");
    }
    let reported = data.get("overall_score").and_then(score_value).unwrap_or(0);

    let overall_score = if raw_subscores.is_some_and(|m| !m.is_empty()) {
        let calculated = subscores.total();
        if calculated != reported {
            warn!(
                reported,
                calculated, "Score mismatch detected, using sum of subscores"
            );
        } else {
            debug!(score = calculated, "Score validation passed");
        }
        calculated
    } else {
        reported
    };

    let [strengths, issues, recommendations, bad_bullets, improved_bullets] =
        LIST_FIELDS.map(|field| normalize_list(field, data.get(field)));

    EvaluationResult {
        overall_score,
        subscores,
        score_scale: None,
        summary: data.get("summary").map(render).unwrap_or_default(),
        reasoning: data.get("reasoning").map(render).unwrap_or_default(),
        strengths,
        issues,
        recommendations,
        bad_bullets,
        improved_bullets,
        feedback_by_category: normalize_feedback(data.get("feedback_by_category")),
        error: None,
    }
}

fn parse_subscores(raw: &Map<String, Value>) -> SubScores {
    let mut scores = SubScores::default();
    for category in CATEGORIES {
        if let Some(value) = raw.get(category).and_then(score_value) {
            scores.set(category, value);
        }
    }
    scores
}

/// Reads a score given as an integer, a float (rounded) or a numeric string.
fn score_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    }
}

fn normalize_list(field: &str, value: Option<&Value>) -> Vec<String> {
    let (items, converted) = coerce_list(value);
    if converted > 0 {
        warn!(
            field,
            items = items.len(),
            converted,
            "Normalized list items to strings"
        );
    }
    items
}

fn normalize_feedback(value: Option<&Value>) -> FeedbackByCategory {
    let mut feedback = FeedbackByCategory::default();
    let Some(categories) = value.and_then(Value::as_object) else {
        return feedback;
    };

    for (category, entry) in categories {
        let Some(slot) = feedback.get_mut(category) else {
            debug!(category = %category, "Dropping feedback for unknown category");
            continue;
        };
        let Some(entry) = entry.as_object() else {
            continue;
        };
        *slot = CategoryFeedback {
            strengths: normalize_list(
                &format!("feedback_by_category.{category}.strengths"),
                entry.get("strengths"),
            ),
            issues: normalize_list(
                &format!("feedback_by_category.{category}.issues"),
                entry.get("issues"),
            ),
            recommendations: normalize_list(
                &format!("feedback_by_category.{category}.recommendations"),
                entry.get("recommendations"),
            ),
        };
    }

    feedback
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
