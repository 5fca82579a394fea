use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::schema::{Category, ParameterSet};

/// Score assigned when the model omits a parameter or supplies an unusable
/// value.
pub const NEUTRAL_SCORE: u8 = 3;

/// Upper bound on per-parameter justification text.
pub const REASON_MAX_CHARS: usize = 280;

const NEUTRAL_REASON: &str =
    "Evidence is limited/unclear in the provided text, so a neutral score is given.";

/// Normalize a parameter name for comparison: trim, lowercase, collapse
/// internal whitespace runs. Spelling is never corrected.
pub fn normalize_name(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Structured reply as parsed from the model, before reconciliation.
///
/// Every field tolerates drift: missing keys, wrong value types, and extra
/// entries all deserialize rather than failing the request, because the
/// reconciler is the layer that restores the invariants.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuditReply {
    #[serde(default)]
    pub parameter_scores: Vec<RawParameterScore>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub errors: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub feedback: Vec<String>,
    #[serde(default, deserialize_with = "lenient_actions")]
    pub action_plan: Vec<ActionItem>,
}

/// A single raw score entry; all fields are untrusted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParameterScore {
    #[serde(default)]
    pub category: Value,
    #[serde(default)]
    pub parameter: Value,
    #[serde(default)]
    pub score: Value,
    #[serde(default)]
    pub reason: Value,
}

/// One step of the advisory coaching plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionItem {
    pub day: i64,
    pub task: String,
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
        .collect())
}

fn lenient_actions<'de, D>(deserializer: D) -> Result<Vec<ActionItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| {
            let task = coerce_string(item.get("task").unwrap_or(&Value::Null));
            if task.is_empty() {
                return None;
            }
            let day = item.get("day").and_then(Value::as_i64).unwrap_or(0);
            Some(ActionItem { day, task })
        })
        .collect())
}

/// A reconciled per-parameter score. `parameter` always equals a canonical
/// name from the request's parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterScore {
    pub category: Category,
    pub parameter: String,
    pub score: u8,
    pub reason: String,
}

/// Percentages per category, always recomputed server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryScores {
    #[serde(rename = "Language")]
    pub language: u8,
    #[serde(rename = "Soft Skills")]
    pub soft_skills: u8,
    #[serde(rename = "Process")]
    pub process: u8,
}

/// Output of reconciliation: exactly one entry per canonical parameter, in
/// canonical order, with aggregates derived from the entries alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledScores {
    pub parameter_scores: Vec<ParameterScore>,
    pub invalid_params: Vec<String>,
    pub final_score: u8,
    pub category_scores: CategoryScores,
}

/// Map an untrusted reply onto the canonical parameter set.
///
/// Unmappable entries are dropped (and recorded), duplicates collapse to the
/// first occurrence, missing parameters are synthesized with a neutral
/// score, and every aggregate is recomputed from the reconciled list. Any
/// aggregate values in the raw reply are ignored.
pub fn reconcile(raw_entries: &[RawParameterScore], parameters: &ParameterSet) -> ReconciledScores {
    // normalized name -> (canonical name, category, position within category)
    let mut canonical: HashMap<String, (&str, Category, usize)> = HashMap::new();
    for category in Category::ALL {
        for (position, name) in parameters.category(category).iter().enumerate() {
            canonical
                .entry(normalize_name(name))
                .or_insert((name.as_str(), category, position));
        }
    }

    let mut fixed: Vec<ParameterScore> = Vec::with_capacity(parameters.total());
    let mut invalid_params = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();

    for entry in raw_entries {
        let raw_name = coerce_string(&entry.parameter);
        let normalized = normalize_name(&raw_name);

        let Some(&(canonical_name, canonical_category, _)) = canonical.get(&normalized) else {
            invalid_params.push(raw_name);
            continue;
        };

        // Duplicates of an already-mapped parameter carry no new information.
        if !taken.insert(normalized) {
            continue;
        }

        let stated = coerce_string(&entry.category);
        let category = Category::from_label(&stated).unwrap_or(canonical_category);

        let reason: String = coerce_string(&entry.reason)
            .chars()
            .take(REASON_MAX_CHARS)
            .collect();

        fixed.push(ParameterScore {
            category,
            parameter: canonical_name.to_string(),
            score: coerce_score(&entry.score),
            reason,
        });
    }

    // Synthesize neutral entries for every parameter the reply omitted.
    for (category, name) in parameters.iter() {
        if !taken.contains(&normalize_name(name)) {
            fixed.push(ParameterScore {
                category,
                parameter: name.to_string(),
                score: NEUTRAL_SCORE,
                reason: NEUTRAL_REASON.to_string(),
            });
        }
    }

    fixed.sort_by_key(|entry| {
        let position = canonical
            .get(&normalize_name(&entry.parameter))
            .map(|&(_, _, position)| position)
            .unwrap_or(usize::MAX);
        (entry.category.rank(), position)
    });

    let (final_score, category_scores) = recompute_scores(&fixed);

    ReconciledScores {
        parameter_scores: fixed,
        invalid_params,
        final_score,
        category_scores,
    }
}

/// Deterministic aggregation: round(100 * sum / (5 * count)), 0 for an empty
/// category, computed over the reconciled entries only.
pub fn recompute_scores(scores: &[ParameterScore]) -> (u8, CategoryScores) {
    let collect = |category: Category| -> Vec<u8> {
        scores
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| entry.score)
            .collect()
    };

    let language = collect(Category::Language);
    let soft_skills = collect(Category::SoftSkills);
    let process = collect(Category::Process);

    let all: Vec<u8> = scores.iter().map(|entry| entry.score).collect();

    let category_scores = CategoryScores {
        language: compute_percent(&language),
        soft_skills: compute_percent(&soft_skills),
        process: compute_percent(&process),
    };

    (compute_percent(&all), category_scores)
}

fn compute_percent(scores: &[u8]) -> u8 {
    if scores.is_empty() {
        return 0;
    }
    let sum: u32 = scores.iter().map(|&score| u32::from(score)).sum();
    let max = scores.len() as u32 * 5;
    ((f64::from(sum) / f64::from(max)) * 100.0).round() as u8
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

/// Clamp an untrusted score to an integer in [1, 5]. Values that do not
/// parse as a number inside that range fall back to the neutral 3.
fn coerce_score(value: &Value) -> u8 {
    let numeric = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match numeric {
        Some(score) if score.is_finite() && (1.0..=5.0).contains(&score) => score.round() as u8,
        _ => NEUTRAL_SCORE,
    }
}
