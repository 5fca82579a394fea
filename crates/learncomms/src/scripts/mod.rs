//! Coaching script generation: prompt assembly from the static intelligence
//! tables and labeled-section extraction of the reply.

mod intelligence;

pub use intelligence::{emotion_profile, profile_for, EmotionProfile, ScriptProfile};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The script families exposed as `/api/scripts/{segment}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    CallOpening,
    CallClosing,
    CallHold,
    CallTransfer,
    FollowUpCall,
    ObjectionHandling,
    ApologyRecovery,
    DelayHandling,
    ChatSupport,
    EmailScripts,
}

struct ScriptTemplate {
    intro: &'static str,
    rules: &'static str,
    temperature: f32,
}

impl ScriptKind {
    pub const ALL: [ScriptKind; 10] = [
        ScriptKind::CallOpening,
        ScriptKind::CallClosing,
        ScriptKind::CallHold,
        ScriptKind::CallTransfer,
        ScriptKind::FollowUpCall,
        ScriptKind::ObjectionHandling,
        ScriptKind::ApologyRecovery,
        ScriptKind::DelayHandling,
        ScriptKind::ChatSupport,
        ScriptKind::EmailScripts,
    ];

    pub fn route_segment(&self) -> &'static str {
        match self {
            ScriptKind::CallOpening => "call-opening",
            ScriptKind::CallClosing => "call-closing",
            ScriptKind::CallHold => "call-hold",
            ScriptKind::CallTransfer => "call-transfer",
            ScriptKind::FollowUpCall => "follow-up-call",
            ScriptKind::ObjectionHandling => "objection-handling",
            ScriptKind::ApologyRecovery => "apology-recovery",
            ScriptKind::DelayHandling => "delay-handling",
            ScriptKind::ChatSupport => "chat-support",
            ScriptKind::EmailScripts => "email-scripts",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.route_segment() == segment)
    }

    pub fn temperature(&self) -> f32 {
        self.template().temperature
    }

    fn template(&self) -> ScriptTemplate {
        match self {
            ScriptKind::CallOpening => ScriptTemplate {
                intro: "Generate THREE DIFFERENT call opening scripts.\n\
                        Script 1: Primary (best balanced)\n\
                        Script 2: Alternative (slightly warmer)\n\
                        Script 3: Alternative (slightly more confident)",
                rules: "- Spoken English\n\
                        - Polite, calm, confident\n\
                        - Each script: 1-2 sentences\n\
                        - Neutral global English\n\
                        - No emojis or explanations",
                temperature: 0.45,
            },
            ScriptKind::CallClosing => ScriptTemplate {
                intro: "Generate THREE DIFFERENT call closing scripts.\n\
                        Script 1: Professional & reassuring\n\
                        Script 2: Warmer & appreciative\n\
                        Script 3: Confident & concise",
                rules: "- Spoken English\n\
                        - Clear closure or next step\n\
                        - 1-2 sentences\n\
                        - Neutral global English",
                temperature: 0.45,
            },
            ScriptKind::CallHold => ScriptTemplate {
                intro: "Generate THREE DIFFERENT call hold / pause scripts.\n\
                        Script 1: Polite & reassuring\n\
                        Script 2: Warmer & empathetic\n\
                        Script 3: Confident & concise",
                rules: "- Ask permission politely\n\
                        - Explain reason briefly\n\
                        - 1-2 sentences",
                temperature: 0.45,
            },
            ScriptKind::CallTransfer => ScriptTemplate {
                intro: "Generate THREE DIFFERENT call transfer scripts.\n\
                        Script 1: Clear & professional\n\
                        Script 2: Warmer & reassuring\n\
                        Script 3: Confident & concise",
                rules: "- Explain reason for transfer\n\
                        - Reassure continuity\n\
                        - 1-2 sentences",
                temperature: 0.45,
            },
            ScriptKind::FollowUpCall => ScriptTemplate {
                intro: "Generate THREE DIFFERENT follow-up call scripts.\n\
                        Script 1: Professional & contextual\n\
                        Script 2: Warmer & reassuring\n\
                        Script 3: Confident & concise",
                rules: "- Reference previous interaction\n\
                        - Sound prepared\n\
                        - 1-2 sentences",
                temperature: 0.45,
            },
            ScriptKind::ObjectionHandling => ScriptTemplate {
                intro: "Generate THREE DIFFERENT objection handling responses.\n\
                        Script 1: Empathetic & balanced\n\
                        Script 2: Calmer & reassuring\n\
                        Script 3: Confident & persuasive",
                rules: "- Acknowledge concern first\n\
                        - No defensiveness\n\
                        - 1-2 sentences",
                temperature: 0.5,
            },
            ScriptKind::ApologyRecovery => ScriptTemplate {
                intro: "Generate THREE DIFFERENT apology / recovery scripts.\n\
                        Script 1: Empathetic & accountable\n\
                        Script 2: Warmer & reassuring\n\
                        Script 3: Solution-focused",
                rules: "- Take responsibility\n\
                        - Reassure corrective action\n\
                        - 1-2 sentences",
                temperature: 0.4,
            },
            ScriptKind::DelayHandling => ScriptTemplate {
                intro: "Generate THREE DIFFERENT delay handling responses.\n\
                        Script 1: Clear & reassuring\n\
                        Script 2: Warmer & empathetic\n\
                        Script 3: Expectation-focused",
                rules: "- Acknowledge delay\n\
                        - Set expectations\n\
                        - 1-2 sentences",
                temperature: 0.4,
            },
            ScriptKind::ChatSupport => ScriptTemplate {
                intro: "Generate THREE DIFFERENT chat support responses.\n\
                        Script 1: Clear & professional\n\
                        Script 2: Warmer & friendlier\n\
                        Script 3: Confident & concise",
                rules: "- Chat-style language\n\
                        - Short sentences\n\
                        - No slang",
                temperature: 0.35,
            },
            ScriptKind::EmailScripts => ScriptTemplate {
                intro: "Generate THREE DIFFERENT professional email messages.\n\
                        Script 1: Clear & professional\n\
                        Script 2: Warmer & polite\n\
                        Script 3: Confident & direct",
                rules: "- Professional email tone\n\
                        - 3-5 short lines\n\
                        - No emojis",
                temperature: 0.35,
            },
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route_segment())
    }
}

/// Additional caller context woven into the prompt without being listed
/// verbatim in the output.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptOverrides {
    #[serde(default)]
    pub role_intent: Option<String>,
    #[serde(default)]
    pub emotion_intent: Option<String>,
    #[serde(default)]
    pub soft_skill_intent: Option<String>,
}

/// Request body for every script endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptRequest {
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_script_type", rename = "type")]
    pub script_type: String,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub overrides: Option<ScriptOverrides>,
}

fn default_script_type() -> String {
    "default".to_string()
}

impl Default for ScriptRequest {
    fn default() -> Self {
        Self {
            category: String::new(),
            script_type: default_script_type(),
            emotion: None,
            overrides: None,
        }
    }
}

/// Raised when the category/type pair names no configured profile.
#[derive(Debug, thiserror::Error)]
#[error("invalid script configuration")]
pub struct InvalidScriptConfiguration;

/// Build the full prompt for a script request.
pub fn build_script_prompt(
    kind: ScriptKind,
    request: &ScriptRequest,
) -> Result<String, InvalidScriptConfiguration> {
    let profile =
        profile_for(&request.category, &request.script_type).ok_or(InvalidScriptConfiguration)?;
    let template = kind.template();

    let mut prompt = format!(
        "You are a workplace communication trainer and customer communication coach.\n\
         \n\
         {intro}\n\
         \n\
         Apply these core soft skills:\n\
         {skills}\n\
         \n\
         Soft-skill balance reference:\n\
         Empathy: {empathy}\n\
         Persuasion: {persuasion}\n\
         Authority: {authority}\n",
        intro = template.intro,
        skills = profile.core_skills.join(", "),
        empathy = profile.balance.empathy,
        persuasion = profile.balance.persuasion,
        authority = profile.balance.authority,
    );

    if let Some(emotion) = request.emotion.as_deref() {
        if let Some(profile) = emotion_profile(emotion) {
            prompt.push_str(&format!(
                "\nEmotional state: {emotion}\n\
                 Tone guidance: {guidance}\n\
                 Apply these emotional handling techniques:\n\
                 {modifiers}\n",
                guidance = profile.tone_guidance,
                modifiers = profile.modifiers.join(", "),
            ));
        }
    }

    if let Some(overrides) = &request.overrides {
        prompt.push_str(
            "\nIMPORTANT CONTEXT FROM USER:\n\
             \n\
             The user has provided additional background and expectations.\n\
             \n\
             You MUST:\n\
             - Adapt your language to suit the user's familiarity level\n\
             - Acknowledge any repeated interactions or prior attempts\n\
             - Adjust clarity, pace, and reassurance accordingly\n\
             - Sound human, calm, and supportive, never corporate or policy-driven\n",
        );

        if let Some(role_intent) = overrides.role_intent.as_deref() {
            prompt.push_str(&format!(
                "\nUser background / familiarity (adjust language and complexity accordingly):\n\
                 \"{role_intent}\"\n"
            ));
        }
        if let Some(emotion_intent) = overrides.emotion_intent.as_deref() {
            prompt.push_str(&format!(
                "\nUser history or situation to acknowledge clearly:\n\"{emotion_intent}\"\n"
            ));
        }
        if let Some(soft_skill_intent) = overrides.soft_skill_intent.as_deref() {
            prompt.push_str(&format!(
                "\nDesired communication style that MUST be clearly demonstrated:\n\
                 \"{soft_skill_intent}\"\n"
            ));
        }

        prompt.push_str(
            "\nNaturally weave these points into the response.\n\
             Do not list them. Do not sound scripted.\n",
        );
    }

    prompt.push_str(&format!(
        "\nRules:\n\
         {rules}\n\
         \n\
         Return output in EXACT format:\n\
         \n\
         Primary:\n\
         <text>\n\
         \n\
         Alternative 1:\n\
         <text>\n\
         \n\
         Alternative 2:\n\
         <text>\n",
        rules = template.rules,
    ));

    Ok(prompt)
}

/// The three labeled variants every script endpoint returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptVariants {
    pub primary: String,
    pub alternative1: String,
    pub alternative2: String,
}

/// Split a raw reply into the three labeled variants. Missing sections come
/// back empty rather than failing; the reply format is advisory only.
pub fn parse_script_variants(raw: &str) -> ScriptVariants {
    ScriptVariants {
        primary: extract_section(raw, "Primary"),
        alternative1: extract_section(raw, "Alternative 1"),
        alternative2: extract_section(raw, "Alternative 2"),
    }
}

/// Capture the text after `label:` up to the next line that starts with a
/// word character, mirroring the labeled-section reply format.
pub fn extract_section(raw: &str, label: &str) -> String {
    let marker = format!("{label}:");
    let Some(index) = raw.find(&marker) else {
        return String::new();
    };

    let rest = raw[index + marker.len()..].trim_start();

    let mut end = rest.len();
    let mut chars = rest.char_indices().peekable();
    while let Some((position, ch)) = chars.next() {
        if ch == '\n' {
            if let Some(&(_, next)) = chars.peek() {
                if next.is_alphanumeric() || next == '_' {
                    end = position;
                    break;
                }
            }
        }
    }

    rest[..end].trim().to_string()
}
