use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use super::schema::{Category, Mode, ParameterSet};

/// How many total guide parameters are required before the guide replaces
/// the mode defaults.
pub const GUIDE_THRESHOLD: usize = 3;

/// Caller-supplied parameter configuration, shaped mode -> category -> names.
///
/// Form submissions arrive loosely typed: sub-objects may be missing, lists
/// may be scalars, and category keys may use the QA sheet's lowercase
/// shorthand. Deserialization never fails; anything unusable collapses to an
/// empty list.
#[derive(Debug, Clone, Default)]
pub struct GuideState {
    modes: HashMap<Mode, GuideModeParams>,
}

#[derive(Debug, Clone, Default)]
struct GuideModeParams {
    language: Vec<String>,
    soft_skills: Vec<String>,
    process: Vec<String>,
}

impl GuideState {
    fn from_value(value: &Value) -> Self {
        let mut modes = HashMap::new();
        if let Value::Object(map) = value {
            for mode in [Mode::Call, Mode::Chat, Mode::Email] {
                if let Some(sub) = map.get(mode.label()) {
                    modes.insert(mode, GuideModeParams::from_value(sub));
                }
            }
        }
        Self { modes }
    }

    fn category_list(&self, mode: Mode, category: Category) -> &[String] {
        match self.modes.get(&mode) {
            Some(params) => match category {
                Category::Language => &params.language,
                Category::SoftSkills => &params.soft_skills,
                Category::Process => &params.process,
            },
            None => &[],
        }
    }
}

impl<'de> Deserialize<'de> for GuideState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(GuideState::from_value(&value))
    }
}

impl GuideModeParams {
    fn from_value(value: &Value) -> Self {
        let list = |keys: &[&str]| -> Vec<String> {
            for key in keys {
                if let Some(found) = value.get(key) {
                    return lenient_string_list(found);
                }
            }
            Vec::new()
        };

        Self {
            language: list(&["Language", "language"]),
            soft_skills: list(&["Soft Skills", "soft", "softSkills"]),
            process: list(&["Process", "process"]),
        }
    }
}

/// Anything that is not a list counts as empty; list entries are stringified
/// the way the form layer would render them.
fn lenient_string_list(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            _ => String::new(),
        })
        .collect()
}

/// Caller-supplied rubric configuration, shaped mode -> parameter -> rubric.
///
/// Rubric bodies are opaque (score-level-keyed text) and only steer prompt
/// construction, so they are carried as raw JSON values.
#[derive(Debug, Clone, Default)]
pub struct RubricState {
    modes: HashMap<Mode, BTreeMap<String, Value>>,
}

impl RubricState {
    fn from_value(value: &Value) -> Self {
        let mut modes = HashMap::new();
        if let Value::Object(map) = value {
            for mode in [Mode::Call, Mode::Chat, Mode::Email] {
                if let Some(Value::Object(rubrics)) = map.get(mode.label()) {
                    let bundle: BTreeMap<String, Value> = rubrics
                        .iter()
                        .filter(|(_, rubric)| !rubric.is_null())
                        .map(|(name, rubric)| (name.clone(), rubric.clone()))
                        .collect();
                    modes.insert(mode, bundle);
                }
            }
        }
        Self { modes }
    }

    fn rubric_for(&self, mode: Mode, parameter: &str) -> Option<&Value> {
        self.modes.get(&mode).and_then(|map| map.get(parameter))
    }
}

impl<'de> Deserialize<'de> for RubricState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(RubricState::from_value(&value))
    }
}

/// The parameter set chosen for a request, plus whether a custom guide won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParameters {
    pub parameters: ParameterSet,
    pub using_guide: bool,
}

/// Merge a caller guide with the mode defaults.
///
/// The sanitized guide is used only when it carries at least
/// [`GUIDE_THRESHOLD`] parameters across all categories; anything sparser
/// falls back to the defaults for the mode.
pub fn resolve_parameters(guide: Option<&GuideState>, mode: Mode) -> ResolvedParameters {
    if let Some(guide) = guide {
        let sanitize = |category: Category| -> Vec<String> {
            guide
                .category_list(mode, category)
                .iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect()
        };

        let language = sanitize(Category::Language);
        let soft_skills = sanitize(Category::SoftSkills);
        let process = sanitize(Category::Process);

        let count = language.len() + soft_skills.len() + process.len();
        if count >= GUIDE_THRESHOLD {
            return ResolvedParameters {
                parameters: ParameterSet::new(language, soft_skills, process),
                using_guide: true,
            };
        }
    }

    ResolvedParameters {
        parameters: ParameterSet::defaults(mode),
        using_guide: false,
    }
}

/// Per-parameter rubric text attached to the resolved set.
pub type RubricBundle = BTreeMap<String, Value>;

/// Attach rubrics to resolved parameters by exact-string match.
///
/// Only active when a custom guide is in use; a parameter without a rubric is
/// simply absent from the bundle. Fuzzy matching happens only when
/// reconciling the response, never here.
pub fn bind_rubrics(
    rubrics: Option<&RubricState>,
    mode: Mode,
    resolved: &ResolvedParameters,
) -> RubricBundle {
    let mut bundle = RubricBundle::new();
    if !resolved.using_guide {
        return bundle;
    }
    let Some(rubrics) = rubrics else {
        return bundle;
    };

    for (_, parameter) in resolved.parameters.iter() {
        if let Some(rubric) = rubrics.rubric_for(mode, parameter) {
            bundle.insert(parameter.to_string(), rubric.clone());
        }
    }
    bundle
}
