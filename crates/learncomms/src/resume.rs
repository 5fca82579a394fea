//! Resume import: extract a structured profile from pasted resume text.

use serde::{Deserialize, Serialize};

/// Profile shape handed back to the editor UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub points: Vec<String>,
}

/// How much raw resume text survives into the fallback summary.
const FALLBACK_SUMMARY_MAX: usize = 2000;

pub fn extraction_prompt(text: &str) -> String {
    format!(
        "Extract resume info and return ONLY valid JSON:\n\
         \n\
         {{\n\
         \x20\"name\":\"\",\n\
         \x20\"title\":\"\",\n\
         \x20\"email\":\"\",\n\
         \x20\"phone\":\"\",\n\
         \x20\"summary\":\"\",\n\
         \x20\"experience\":[\n\
         \x20  {{ \"points\":[\"\",\"\"] }}\n\
         \x20],\n\
         \x20\"skills\":[]\n\
         }}\n\
         \n\
         Resume:\n\
         {text}\n"
    )
}

/// Parse the extraction reply. A reply that is not the expected JSON shape
/// degrades into a profile whose summary carries the raw resume text, so the
/// editor still has something to work with.
pub fn parse_profile(raw: &str, resume_text: &str) -> ResumeProfile {
    match serde_json::from_str::<ResumeProfile>(raw.trim()) {
        Ok(profile) => profile,
        Err(_) => ResumeProfile {
            summary: resume_text.chars().take(FALLBACK_SUMMARY_MAX).collect(),
            ..ResumeProfile::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn well_formed_reply_parses() {
        let raw = json!({
            "name": "Asha Nair",
            "title": "Support Lead",
            "email": "asha@example.com",
            "phone": "",
            "summary": "Eight years in customer support.",
            "experience": [{ "points": ["Led a team of 12"] }],
            "skills": ["escalation handling"]
        })
        .to_string();

        let profile = parse_profile(&raw, "unused");
        assert_eq!(profile.name, "Asha Nair");
        assert_eq!(profile.experience[0].points[0], "Led a team of 12");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let profile = parse_profile(r#"{"name":"Ravi"}"#, "unused");
        assert_eq!(profile.name, "Ravi");
        assert!(profile.skills.is_empty());
        assert!(profile.experience.is_empty());
    }

    #[test]
    fn malformed_reply_falls_back_to_raw_summary() {
        let profile = parse_profile("Sorry, I cannot do that.", "Asha Nair\nSupport Lead");
        assert_eq!(profile.name, "");
        assert!(profile.summary.starts_with("Asha Nair"));
    }

    #[test]
    fn prompt_embeds_resume_text() {
        let prompt = extraction_prompt("Asha Nair, Support Lead");
        assert!(prompt.contains("return ONLY valid JSON"));
        assert!(prompt.contains("Asha Nair, Support Lead"));
    }
}
