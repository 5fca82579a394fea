use serde::Deserialize;

/// Shared request body for reply suggestions and rewrites.
#[derive(Debug, Clone, Deserialize)]
pub struct ComposeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_channel() -> String {
    "chat".to_string()
}

fn default_tone() -> String {
    "neutral".to_string()
}

pub fn reply_prompt(request: &ComposeRequest) -> String {
    format!(
        "You are a professional communication assistant.\n\
         \n\
         Task:\n\
         Suggest POSSIBLE replies to the message below.\n\
         \n\
         Rules:\n\
         - Replies are suggestions, not instructions\n\
         - No judgement, no blame\n\
         - Keep tone respectful and professional\n\
         - Do NOT say \"best reply\"\n\
         - Provide multiple options\n\
         \n\
         Context:\n\
         Channel: {channel}\n\
         Desired tone: {tone}\n\
         \n\
         Provide EXACTLY 3 reply options.\n\
         Each reply should be short and practical.\n\
         \n\
         Message:\n\
         {text}\n",
        channel = request.channel,
        tone = request.tone,
        text = request.text,
    )
}

pub fn writing_prompt(request: &ComposeRequest) -> String {
    format!(
        "You are a professional workplace writing assistant.\n\
         \n\
         Rewrite the message below into THREE different versions.\n\
         \n\
         Context:\n\
         - Channel: {channel}\n\
         - Desired tone: {tone}\n\
         \n\
         Message:\n\
         {text}\n",
        channel = request.channel,
        tone = request.tone,
        text = request.text,
    )
}

/// Every non-empty trimmed line is a reply option.
pub fn split_replies(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rewrite versions additionally drop very short fragments such as bare
/// numbering lines.
pub fn split_versions(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > 5)
        .map(str::to_string)
        .collect()
}
