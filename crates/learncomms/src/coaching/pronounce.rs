use serde::Deserialize;

/// Coaching flavor selected by the optional `mode` field. Anything other
/// than `sentence` or `email` gets single-word pronunciation coaching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PronounceMode {
    Sentence,
    Email,
    #[serde(other)]
    #[default]
    Word,
}

pub fn pronounce_prompt(mode: PronounceMode, text: &str) -> (String, f32) {
    match mode {
        PronounceMode::Sentence => (sentence_prompt(text), 0.0),
        PronounceMode::Email => (email_prompt(text), 0.4),
        PronounceMode::Word => (word_prompt(text), 0.2),
    }
}

fn word_prompt(word: &str) -> String {
    format!(
        "You are an English pronunciation coach.\n\
         \n\
         CRITICAL RULES:\n\
         - Plain text only\n\
         - No markdown\n\
         - No bullets\n\
         - Do NOT split pronunciation across lines\n\
         - Alphabet-only pronunciation\n\
         - Use hyphens to show syllables\n\
         - Use FULL CAPITAL LETTERS for the stressed syllable\n\
         \n\
         FORMAT (EXACT):\n\
         \n\
         IPA: /.../\n\
         Syllables: number\n\
         Stress: number\n\
         Correct pronunciation: alphabet-based pronunciation with hyphens and CAPS for stress\n\
         Common mistakes: short phrase\n\
         Why it happens: simple explanation\n\
         Fix: simple habit correction\n\
         Correct word: {word}\n"
    )
}

fn sentence_prompt(text: &str) -> String {
    format!(
        "You are an English language trainer.\n\
         \n\
         Task:\n\
         - Identify grammar, tense, word order, and punctuation issues.\n\
         - Provide ONE corrected sentence.\n\
         - Provide TWO simple alternative correct sentences.\n\
         \n\
         Use EXACT format:\n\
         \n\
         Incorrect sentence:\n\
         {text}\n\
         \n\
         Why it is incorrect:\n\
         <clear explanation>\n\
         \n\
         Corrected sentence:\n\
         <best corrected version>\n\
         \n\
         Alternative correct sentence 1:\n\
         <simple alternative>\n\
         \n\
         Alternative correct sentence 2:\n\
         <simple alternative>\n"
    )
}

fn email_prompt(text: &str) -> String {
    format!(
        "You are an English communication trainer.\n\
         \n\
         Convert the message into THREE clearly different professional emails.\n\
         \n\
         Styles:\n\
         1. Formal and polite\n\
         2. Neutral and clear\n\
         3. Direct and concise\n\
         \n\
         Use EXACT format:\n\
         \n\
         Email version 1 (Formal):\n\
         Subject:\n\
         <body>\n\
         \n\
         Email version 2 (Neutral):\n\
         Subject:\n\
         <body>\n\
         \n\
         Email version 3 (Direct):\n\
         Subject:\n\
         <body>\n\
         \n\
         Text:\n\
         {text}\n"
    )
}
