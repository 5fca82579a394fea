use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed scoring categories, in canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Language,
    #[serde(rename = "Soft Skills")]
    SoftSkills,
    Process,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Language, Category::SoftSkills, Category::Process];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Language => "Language",
            Category::SoftSkills => "Soft Skills",
            Category::Process => "Process",
        }
    }

    /// Position in the fixed output ordering.
    pub fn rank(&self) -> usize {
        match self {
            Category::Language => 0,
            Category::SoftSkills => 1,
            Category::Process => 2,
        }
    }

    /// Parse a category label as returned by the model, exact match only.
    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "Language" => Some(Category::Language),
            "Soft Skills" => Some(Category::SoftSkills),
            "Process" => Some(Category::Process),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Communication channel context selecting defaults and prompt phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Call,
    Chat,
    Email,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Call => "call",
            Mode::Chat => "chat",
            Mode::Email => "email",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(Mode::Call),
            "chat" => Ok(Mode::Chat),
            "email" => Ok(Mode::Email),
            _ => Err(InvalidMode),
        }
    }
}

/// Raised when a request names a mode outside the closed set.
#[derive(Debug, thiserror::Error)]
#[error("invalid mode, must be call/chat/email")]
pub struct InvalidMode;

/// Ordered parameter names per category. Order determines output ordering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterSet {
    language: Vec<String>,
    soft_skills: Vec<String>,
    process: Vec<String>,
}

impl ParameterSet {
    pub fn new(language: Vec<String>, soft_skills: Vec<String>, process: Vec<String>) -> Self {
        Self {
            language,
            soft_skills,
            process,
        }
    }

    /// Hardcoded per-mode defaults used when no usable guide is supplied.
    pub fn defaults(mode: Mode) -> Self {
        let owned = |names: &[&str]| names.iter().map(|name| name.to_string()).collect();

        match mode {
            Mode::Call => Self::new(
                owned(&[
                    "Grammar",
                    "Fluency",
                    "Pronunciation",
                    "Vocabulary / Word choice",
                ]),
                owned(&[
                    "Empathy / Reassurance",
                    "Active Listening",
                    "Closing (recap + next steps + confirm resolution)",
                ]),
                owned(&["Resolution accuracy", "Process adherence / compliance"]),
            ),
            Mode::Chat => Self::new(
                owned(&[
                    "Grammar",
                    "Sentence clarity (simple English)",
                    "Spelling",
                    "Punctuation",
                    "Tone / professional wording",
                ]),
                owned(&[
                    "Greeting & opening",
                    "Empathy & acknowledgement",
                    "Ownership & accountability",
                ]),
                owned(&[
                    "Resolution accuracy",
                    "Documentation / internal notes quality",
                ]),
            ),
            Mode::Email => Self::new(
                owned(&[
                    "Grammar accuracy",
                    "Clarity & simplicity",
                    "Tone in writing (polite positive)",
                ]),
                owned(&[
                    "Subject line quality",
                    "Empathy / acknowledgement",
                    "Closing & next steps",
                ]),
                owned(&["Next Steps"]),
            ),
        }
    }

    pub fn category(&self, category: Category) -> &[String] {
        match category {
            Category::Language => &self.language,
            Category::SoftSkills => &self.soft_skills,
            Category::Process => &self.process,
        }
    }

    pub fn total(&self) -> usize {
        self.language.len() + self.soft_skills.len() + self.process.len()
    }

    /// All parameters in canonical order, paired with their category.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        Category::ALL.into_iter().flat_map(move |category| {
            self.category(category)
                .iter()
                .map(move |name| (category, name.as_str()))
        })
    }

    pub fn counts(&self) -> ParamsCount {
        ParamsCount {
            language: self.language.len(),
            soft_skills: self.soft_skills.len(),
            process: self.process.len(),
        }
    }
}

/// Per-category parameter counts surfaced in response metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamsCount {
    #[serde(rename = "Language")]
    pub language: usize,
    #[serde(rename = "Soft Skills")]
    pub soft_skills: usize,
    #[serde(rename = "Process")]
    pub process: usize,
}
