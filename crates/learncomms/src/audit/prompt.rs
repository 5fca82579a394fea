use serde_json::{json, Value};

use super::resolver::{ResolvedParameters, RubricBundle};
use super::schema::{Category, Mode};

/// System and user instruction pair submitted for an audit.
#[derive(Debug, Clone)]
pub struct AuditPrompt {
    pub system: String,
    pub user: String,
}

const AUDIT_SYSTEM: &str = "\
You are a strict QA auditor for customer support communication.

ABSOLUTE RULES:
- You MUST score ONLY the provided parameters.
- You MUST use parameter names EXACTLY as given.
- Do NOT rename/rephrase/shorten parameters.
- Score each parameter 1 to 5.
- Use evidence from the conversation/email.
- If evidence is missing, score conservatively (2 or 3) and explain why.
- Return valid JSON only.";

impl AuditPrompt {
    /// Build the instruction payload enumerating the exact allowed parameter
    /// strings per category plus any bound rubric text.
    pub fn build(
        mode: Mode,
        text: &str,
        evaluator_name: &str,
        agent_name: &str,
        resolved: &ResolvedParameters,
        rubrics: &RubricBundle,
    ) -> Self {
        let allowed = allowed_by_category(resolved);
        let allowed_json = serde_json::to_string_pretty(&allowed)
            .unwrap_or_else(|_| "{}".to_string());
        let rubric_json =
            serde_json::to_string_pretty(rubrics).unwrap_or_else(|_| "{}".to_string());

        let user = format!(
            "Mode: {mode}\n\
             Evaluator Name: {evaluator_name}\n\
             Agent Name: {agent_name}\n\
             \n\
             Conversation/Email:\n\
             {text}\n\
             \n\
             ALLOWED PARAMETERS BY CATEGORY (use exact strings):\n\
             {allowed_json}\n\
             \n\
             RUBRICS:\n\
             {rubric_json}\n\
             \n\
             OUTPUT REQUIREMENTS:\n\
             - parameterScores MUST include ALL allowed parameters (no skipping).\n\
             - Each parameter entry includes: category, parameter, score, reason.\n\
             - Score must be integer 1-5.\n\
             \n\
             Return ONLY JSON in this schema:\n\
             {{\n\
             \x20 \"mode\": \"call|chat|email\",\n\
             \x20 \"parameterScores\": [\n\
             \x20   {{ \"category\":\"Language\", \"parameter\":\"...\", \"score\":1, \"reason\":\"...\" }}\n\
             \x20 ],\n\
             \x20 \"errors\": [\"...\"],\n\
             \x20 \"feedback\": [\"...\"],\n\
             \x20 \"actionPlan\": [\n\
             \x20   {{ \"day\":1, \"task\":\"...\" }}\n\
             \x20 ]\n\
             }}"
        );

        Self {
            system: AUDIT_SYSTEM.to_string(),
            user,
        }
    }
}

fn allowed_by_category(resolved: &ResolvedParameters) -> Value {
    json!({
        Category::Language.label(): resolved.parameters.category(Category::Language),
        Category::SoftSkills.label(): resolved.parameters.category(Category::SoftSkills),
        Category::Process.label(): resolved.parameters.category(Category::Process),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::resolver::resolve_parameters;
    use serde_json::json;

    #[test]
    fn prompt_enumerates_exact_parameter_strings() {
        let resolved = resolve_parameters(None, Mode::Chat);
        let prompt = AuditPrompt::build(
            Mode::Chat,
            "customer: hi",
            "Priya",
            "Arun",
            &resolved,
            &RubricBundle::new(),
        );

        assert!(prompt.system.contains("strict QA auditor"));
        assert!(prompt.user.contains("Mode: chat"));
        assert!(prompt.user.contains("Evaluator Name: Priya"));
        for (_, parameter) in resolved.parameters.iter() {
            assert!(
                prompt.user.contains(parameter),
                "prompt missing parameter {parameter}"
            );
        }
    }

    #[test]
    fn prompt_includes_bound_rubric_text() {
        let resolved = resolve_parameters(None, Mode::Call);
        let mut bundle = RubricBundle::new();
        bundle.insert(
            "Grammar".to_string(),
            json!({ "5": "flawless grammar throughout" }),
        );

        let prompt = AuditPrompt::build(Mode::Call, "text", "", "", &resolved, &bundle);
        assert!(prompt.user.contains("flawless grammar throughout"));
    }
}
