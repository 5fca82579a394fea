//! Ask LearnComms: a scoped trainer Q&A with a fast topic block-list and a
//! defensive JSON reply shape.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Answers are truncated to this many bytes when the reply is not JSON and
/// the raw text stands in for the answer.
pub const FALLBACK_ANSWER_MAX: usize = 1600;

const BLOCKED_TOPICS: &str = "(?i)(politics|election|prime minister|cricket score|bitcoin price\
|stock price|latest news|instagram|movie|songs|celebrity|coding|javascript|python|java program\
|bug fix|server error|api code)";

pub const REFUSAL_MESSAGE: &str = "I\u{2019}m Ask LearnComms. I help only with English learning, \
workplace/corporate communication, soft skills training, college communication, and IELTS \
preparation.\n\nTry asking:\n\u{2022} Rewrite this email professionally\n\u{2022} Correct my \
sentence and explain\n\u{2022} Emotional intelligence training with activities\n\u{2022} \
Non-verbal communication tips for interviews\n\u{2022} Sales call roleplay script\n\u{2022} \
IELTS Speaking Part 2 sample answer";

/// Fast pre-provider filter for questions clearly outside the trainer scope.
pub fn is_blocked_topic(text: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(BLOCKED_TOPICS).expect("static block-list pattern compiles"));
    pattern.is_match(text)
}

pub fn trainer_system_prompt() -> &'static str {
    "You are \"Ask LearnComms\" \u{2014} a Communication + Corporate + Softskills Trainer Engine.\n\
     \n\
     Allowed scope (YOU MUST ANSWER these):\n\
     1) English learning:\n\
     - pronunciation, fluency, intonation, grammar, vocabulary, writing clarity\n\
     \n\
     2) Workplace / corporate communication:\n\
     - calls, chats, emails, meetings, interviews, professional tone\n\
     - customer support communication, objection handling (communication part)\n\
     - conflict handling, escalation language, confidence speaking\n\
     \n\
     3) Soft skills / behavioural skills:\n\
     - emotional intelligence, empathy, professionalism, teamwork\n\
     - leadership communication, active listening, assertiveness\n\
     - non-verbal communication (body language guidance)\n\
     - workplace etiquette and communication habits\n\
     \n\
     4) College communication:\n\
     - presentations, group discussion, viva, interview practice, academic writing basics\n\
     \n\
     5) IELTS:\n\
     - IELTS speaking coaching (Part 1/2/3)\n\
     - IELTS writing coaching (Task 1/2) \u{2013} structure + vocabulary + sample answers\n\
     \n\
     Outside scope (REFUSE politely):\n\
     - politics/news/sports scores/crypto/stocks\n\
     - programming/coding/technical debugging\n\
     - entertainment gossip\n\
     \n\
     Trainer behavior rules (IMPORTANT):\n\
     - Always answer like a TRAINER, not a generic chatbot.\n\
     - Always include: WHAT to do + WHY it works + HOW to practice.\n\
     - Provide roleplays / activities whenever relevant.\n\
     - Avoid long essays. Keep it structured and practical.\n\
     - Keep language simple, professional, and learner-friendly.\n\
     - If user asks \u{201c}training content\u{201d}, provide:\n\
     \u{2022} Session plan (20\u{2013}60 min)\n\
     \u{2022} Trainer instructions\n\
     \u{2022} Activities (roleplay / quiz / drill)\n\
     \u{2022} Debrief questions\n\
     \n\
     Return ONLY valid JSON in EXACT format (no markdown, no extra keys):\n\
     \n\
     {\n\
     \x20 \"intent\": \"string\",\n\
     \x20 \"answer\": \"string\",\n\
     \x20 \"explanation\": \"string\",\n\
     \x20 \"examples\": [\"...\"],\n\
     \x20 \"drills\": [\"...\"],\n\
     \x20 \"do_dont\": [\"...\"],\n\
     \x20 \"roleplay\": [\"...\"],\n\
     \x20 \"activityPlan\": [\"...\"],\n\
     \x20 \"followups\": [\"...\"]\n\
     }\n\
     \n\
     Intent must be one of:\n\
     pronunciation | grammar | email | ielts_speaking | ielts_writing | corporate_speaking | \
     softskills | nonverbal | customer_support | sales_communication | general"
}

/// Trainer response with every field guaranteed present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainerAnswer {
    pub intent: String,
    pub answer: String,
    pub explanation: String,
    pub examples: Vec<String>,
    pub drills: Vec<String>,
    pub do_dont: Vec<String>,
    pub roleplay: Vec<String>,
    #[serde(rename = "activityPlan")]
    pub activity_plan: Vec<String>,
    pub followups: Vec<String>,
}

/// Parse the trainer reply, filling every field with a safe default. A reply
/// that is not JSON at all becomes a general answer carrying the raw text.
pub fn parse_trainer_reply(raw: &str) -> TrainerAnswer {
    let Ok(value) = serde_json::from_str::<Value>(raw.trim()) else {
        return fallback_answer(raw);
    };
    let Some(object) = value.as_object() else {
        return fallback_answer(raw);
    };

    let field = |name: &str| -> String {
        object
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let list = |name: &str| -> Vec<String> {
        object
            .get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };

    let mut intent = field("intent");
    if intent.is_empty() {
        intent = "general".to_string();
    }

    TrainerAnswer {
        intent,
        answer: field("answer"),
        explanation: field("explanation"),
        examples: list("examples"),
        drills: list("drills"),
        do_dont: list("do_dont"),
        roleplay: list("roleplay"),
        activity_plan: list("activityPlan"),
        followups: list("followups"),
    }
}

fn fallback_answer(raw: &str) -> TrainerAnswer {
    let answer: String = raw.chars().take(FALLBACK_ANSWER_MAX).collect();
    TrainerAnswer {
        intent: "general".to_string(),
        answer,
        explanation: String::new(),
        examples: Vec::new(),
        drills: Vec::new(),
        do_dont: Vec::new(),
        roleplay: Vec::new(),
        activity_plan: Vec::new(),
        followups: Vec::new(),
    }
}
