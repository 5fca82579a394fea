use serde::Serialize;

/// Neutral reading of a message: intent, tone, focus, and what it is not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedMessage {
    pub likely_intent: String,
    pub tone: String,
    pub focus: String,
    pub not_intent: String,
}

pub fn decode_prompt(text: &str) -> String {
    format!(
        "You are a communication clarity assistant.\n\
         \n\
         Your role is to HELP the reader understand a message or conversation.\n\
         You must NOT judge, blame, or take sides.\n\
         \n\
         Rules:\n\
         - Use neutral, non-absolute language\n\
         - Use words like \"likely\", \"may\", \"possibly\"\n\
         - Do NOT say who is right or wrong\n\
         - Do NOT give advice unless asked\n\
         \n\
         Analyze the message and respond in EXACTLY this format:\n\
         \n\
         Likely intent:\n\
         <one or two sentences>\n\
         \n\
         Emotional tone:\n\
         <one or two words or a short phrase>\n\
         \n\
         What the sender is focusing on:\n\
         <one short sentence>\n\
         \n\
         What this message is NOT:\n\
         <one short sentence>\n\
         \n\
         Message:\n\
         {text}\n"
    )
}

/// Walk the reply line by line, switching sections on the known headings and
/// accumulating everything else into the current section.
pub fn parse_decode_reply(raw: &str) -> DecodedMessage {
    #[derive(Clone, Copy, PartialEq)]
    enum Section {
        None,
        Intent,
        Tone,
        Focus,
        Not,
    }

    let mut decoded = DecodedMessage::default();
    let mut section = Section::None;

    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let lower = line.to_lowercase();

        if lower.starts_with("likely intent") {
            section = Section::Intent;
            continue;
        }
        if lower.starts_with("emotional tone") {
            section = Section::Tone;
            continue;
        }
        if lower.starts_with("what the sender is focusing on") {
            section = Section::Focus;
            continue;
        }
        if lower.starts_with("what this message is not") {
            section = Section::Not;
            continue;
        }

        let target = match section {
            Section::Intent => &mut decoded.likely_intent,
            Section::Tone => &mut decoded.tone,
            Section::Focus => &mut decoded.focus,
            Section::Not => &mut decoded.not_intent,
            Section::None => continue,
        };
        if !target.is_empty() {
            target.push(' ');
        }
        target.push_str(line);
    }

    decoded
}
