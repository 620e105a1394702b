//! Canonical evaluation result returned to callers, plus the degraded fallback.

use serde::Serialize;

/// Category names in scoring order.
pub const CATEGORIES: [&str; 5] = ["structure", "technical_depth", "impact", "clarity", "ats"];

/// Maximum points per category. Informational only: attached to the degraded
/// result, never enforced as a ceiling on reconciled scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreScale {
    pub structure: u32,
    pub technical_depth: u32,
    pub impact: u32,
    pub clarity: u32,
    pub ats: u32,
}

pub const SCORE_SCALE: ScoreScale = ScoreScale {
    structure: 20,
    technical_depth: 25,
    impact: 25,
    clarity: 15,
    ats: 15,
};

/// Per-category sub-scores. Absent categories stay absent in the serialized output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubScores {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_depth: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ats: Option<i64>,
}

impl SubScores {
    pub fn get(&self, category: &str) -> Option<i64> {
        match category {
            "structure" => self.structure,
            "technical_depth" => self.technical_depth,
            "impact" => self.impact,
            "clarity" => self.clarity,
            "ats" => self.ats,
            _ => None,
        }
    }

    pub fn set(&mut self, category: &str, value: i64) {
        match category {
            "structure" => self.structure = Some(value),
            "technical_depth" => self.technical_depth = Some(value),
            "impact" => self.impact = Some(value),
            "clarity" => self.clarity = Some(value),
            "ats" => self.ats = Some(value),
            _ => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        CATEGORIES.iter().all(|c| self.get(c).is_none())
    }

    /// Sum of the five categories; missing ones count as 0. Saturates at the i64 bounds.
    pub fn total(&self) -> i64 {
        CATEGORIES
            .iter()
            .filter_map(|c| self.get(c))
            .fold(0i64, |acc, v| acc.saturating_add(v))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryFeedback {
    pub strengths: Vec<String>,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackByCategory {
    pub structure: CategoryFeedback,
    pub technical_depth: CategoryFeedback,
    pub impact: CategoryFeedback,
    pub clarity: CategoryFeedback,
    pub ats: CategoryFeedback,
}

impl FeedbackByCategory {
    pub fn get_mut(&mut self, category: &str) -> Option<&mut CategoryFeedback> {
        match category {
            "structure" => Some(&mut self.structure),
            "technical_depth" => Some(&mut self.technical_depth),
            "impact" => Some(&mut self.impact),
            "clarity" => Some(&mut self.clarity),
            "ats" => Some(&mut self.ats),
            _ => None,
        }
    }
}

/// The evaluation contract handed to the HTTP layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pub overall_score: i64,
    pub subscores: SubScores,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_scale: Option<ScoreScale>,
    pub summary: String,
    pub reasoning: String,
    pub strengths: Vec<String>,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub bad_bullets: Vec<String>,
    pub improved_bullets: Vec<String>,
    pub feedback_by_category: FeedbackByCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvaluationResult {
    /// Fixed fallback used whenever the model output cannot be turned into a result.
    pub fn degraded(description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            overall_score: 0,
            subscores: SubScores::default(),
            score_scale: Some(SCORE_SCALE),
            summary: "AI failed to produce valid JSON".to_string(),
            reasoning: description.clone(),
            strengths: vec![],
            issues: vec!["AI engine returned malformed output".to_string()],
            recommendations: vec![
                "Try again".to_string(),
                "Reduce resume length".to_string(),
                "Simplify formatting".to_string(),
            ],
            error: Some(description),
            ..Default::default()
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}
