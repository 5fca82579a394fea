//! Static coaching intelligence: per-category soft-skill profiles and
//! emotion handling guidance used to steer script prompts.

/// Weighting between the three persuasion levers for a script profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyBalance {
    pub empathy: f32,
    pub persuasion: f32,
    pub authority: f32,
}

/// Skill profile applied to one script category/type pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptProfile {
    pub core_skills: &'static [&'static str],
    pub balance: StrategyBalance,
}

/// Tone guidance applied when the caller reports a customer emotion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionProfile {
    pub tone_guidance: &'static str,
    pub modifiers: &'static [&'static str],
}

/// Look up the profile for a category/type pair, falling back to the
/// category default when the type is unknown. `None` means the category
/// itself is not configured.
pub fn profile_for(category: &str, script_type: &str) -> Option<&'static ScriptProfile> {
    let profiles = category_profiles(category)?;
    profiles
        .iter()
        .find(|(name, _)| *name == script_type)
        .or_else(|| profiles.iter().find(|(name, _)| *name == "default"))
        .map(|(_, profile)| profile)
}

pub fn emotion_profile(emotion: &str) -> Option<&'static EmotionProfile> {
    EMOTIONS
        .iter()
        .find(|(name, _)| *name == emotion)
        .map(|(_, profile)| profile)
}

type ProfileTable = &'static [(&'static str, ScriptProfile)];

fn category_profiles(category: &str) -> Option<ProfileTable> {
    Some(match category {
        "callOpening" => CALL_OPENING,
        "callClosing" => CALL_CLOSING,
        "callHold" => CALL_HOLD,
        "callTransfer" => CALL_TRANSFER,
        "followUpCall" => FOLLOW_UP_CALL,
        "objectionHandling" => OBJECTION_HANDLING,
        "apologyRecovery" => APOLOGY_RECOVERY,
        "delayHandling" => DELAY_HANDLING,
        "chatSupport" => CHAT_SUPPORT,
        "emailScripts" => EMAIL_SCRIPTS,
        _ => return None,
    })
}

const CALL_OPENING: ProfileTable = &[
    (
        "default",
        ScriptProfile {
            core_skills: &[
                "empathy",
                "politeness",
                "professional warmth",
                "emotional validation",
            ],
            balance: StrategyBalance {
                empathy: 0.6,
                persuasion: 0.2,
                authority: 0.2,
            },
        },
    ),
    (
        "customerCare",
        ScriptProfile {
            core_skills: &[
                "empathy",
                "reassurance",
                "active listening",
                "de-escalation awareness",
            ],
            balance: StrategyBalance {
                empathy: 0.7,
                persuasion: 0.1,
                authority: 0.2,
            },
        },
    ),
    (
        "sales",
        ScriptProfile {
            core_skills: &["confidence", "rapport building", "value framing"],
            balance: StrategyBalance {
                empathy: 0.3,
                persuasion: 0.5,
                authority: 0.2,
            },
        },
    ),
];

const CALL_CLOSING: ProfileTable = &[
    (
        "default",
        ScriptProfile {
            core_skills: &[
                "reassurance",
                "gratitude",
                "professional closure",
                "confidence",
            ],
            balance: StrategyBalance {
                empathy: 0.5,
                persuasion: 0.2,
                authority: 0.3,
            },
        },
    ),
    (
        "customerCare",
        ScriptProfile {
            core_skills: &["gratitude", "emotional reassurance", "next-step clarity"],
            balance: StrategyBalance {
                empathy: 0.6,
                persuasion: 0.1,
                authority: 0.3,
            },
        },
    ),
    (
        "sales",
        ScriptProfile {
            core_skills: &["confidence", "positive reinforcement", "future engagement"],
            balance: StrategyBalance {
                empathy: 0.3,
                persuasion: 0.4,
                authority: 0.3,
            },
        },
    ),
];

const CALL_HOLD: ProfileTable = &[
    (
        "default",
        ScriptProfile {
            core_skills: &["politeness", "expectation setting", "reassurance", "clarity"],
            balance: StrategyBalance {
                empathy: 0.5,
                persuasion: 0.1,
                authority: 0.4,
            },
        },
    ),
    (
        "customerCare",
        ScriptProfile {
            core_skills: &["empathy", "reassurance", "time transparency", "calm tone"],
            balance: StrategyBalance {
                empathy: 0.6,
                persuasion: 0.1,
                authority: 0.3,
            },
        },
    ),
    (
        "technicalSupport",
        ScriptProfile {
            core_skills: &["clarity", "professional control", "process explanation"],
            balance: StrategyBalance {
                empathy: 0.3,
                persuasion: 0.1,
                authority: 0.6,
            },
        },
    ),
];

const CALL_TRANSFER: ProfileTable = &[(
    "default",
    ScriptProfile {
        core_skills: &[
            "clarity",
            "continuity reassurance",
            "politeness",
            "ownership handover",
        ],
        balance: StrategyBalance {
            empathy: 0.4,
            persuasion: 0.1,
            authority: 0.5,
        },
    },
)];

const FOLLOW_UP_CALL: ProfileTable = &[(
    "default",
    ScriptProfile {
        core_skills: &[
            "context recall",
            "preparedness",
            "reassurance",
            "professional warmth",
        ],
        balance: StrategyBalance {
            empathy: 0.5,
            persuasion: 0.2,
            authority: 0.3,
        },
    },
)];

const OBJECTION_HANDLING: ProfileTable = &[
    (
        "default",
        ScriptProfile {
            core_skills: &[
                "acknowledgement",
                "calm reasoning",
                "non-defensiveness",
                "persuasive framing",
            ],
            balance: StrategyBalance {
                empathy: 0.4,
                persuasion: 0.4,
                authority: 0.2,
            },
        },
    ),
    (
        "sales",
        ScriptProfile {
            core_skills: &["value reinforcement", "confidence", "listening first"],
            balance: StrategyBalance {
                empathy: 0.3,
                persuasion: 0.5,
                authority: 0.2,
            },
        },
    ),
];

const APOLOGY_RECOVERY: ProfileTable = &[(
    "default",
    ScriptProfile {
        core_skills: &[
            "accountability",
            "sincere apology",
            "corrective reassurance",
            "solution focus",
        ],
        balance: StrategyBalance {
            empathy: 0.6,
            persuasion: 0.1,
            authority: 0.3,
        },
    },
)];

const DELAY_HANDLING: ProfileTable = &[(
    "default",
    ScriptProfile {
        core_skills: &[
            "transparency",
            "expectation setting",
            "empathy",
            "proactive updates",
        ],
        balance: StrategyBalance {
            empathy: 0.5,
            persuasion: 0.1,
            authority: 0.4,
        },
    },
)];

const CHAT_SUPPORT: ProfileTable = &[(
    "default",
    ScriptProfile {
        core_skills: &[
            "brevity",
            "friendliness",
            "clarity",
            "professional tone",
        ],
        balance: StrategyBalance {
            empathy: 0.5,
            persuasion: 0.2,
            authority: 0.3,
        },
    },
)];

const EMAIL_SCRIPTS: ProfileTable = &[(
    "default",
    ScriptProfile {
        core_skills: &[
            "structured writing",
            "polite positivity",
            "clarity",
            "actionable closing",
        ],
        balance: StrategyBalance {
            empathy: 0.4,
            persuasion: 0.2,
            authority: 0.4,
        },
    },
)];

const EMOTIONS: &[(&str, EmotionProfile)] = &[
    (
        "frustrated",
        EmotionProfile {
            tone_guidance: "Stay calm and validating; never mirror the frustration.",
            modifiers: &[
                "acknowledge the effort already spent",
                "avoid policy language",
                "offer one clear next step",
            ],
        },
    ),
    (
        "angry",
        EmotionProfile {
            tone_guidance: "Lower the temperature first; slow pace, short sentences.",
            modifiers: &[
                "apologize for the experience before explaining",
                "no defensiveness",
                "commit to a concrete action",
            ],
        },
    ),
    (
        "anxious",
        EmotionProfile {
            tone_guidance: "Reassure early and often; make the process predictable.",
            modifiers: &[
                "state what happens next and when",
                "use calm, certain wording",
                "avoid conditional hedging",
            ],
        },
    ),
    (
        "confused",
        EmotionProfile {
            tone_guidance: "Simplify; one idea per sentence, no jargon.",
            modifiers: &[
                "restate the situation in plain words",
                "confirm understanding before moving on",
                "offer to repeat or rephrase",
            ],
        },
    ),
    (
        "disappointed",
        EmotionProfile {
            tone_guidance: "Acknowledge the letdown sincerely before solutions.",
            modifiers: &[
                "validate the expectation that was missed",
                "own the gap without excuses",
                "close with a goodwill gesture where possible",
            ],
        },
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_falls_back_to_category_default() {
        let profile = profile_for("callOpening", "nightShift").expect("category exists");
        let default = profile_for("callOpening", "default").expect("default exists");
        assert_eq!(profile, default);
    }

    #[test]
    fn unknown_category_is_none() {
        assert!(profile_for("karaoke", "default").is_none());
    }

    #[test]
    fn every_category_has_a_default() {
        for category in [
            "callOpening",
            "callClosing",
            "callHold",
            "callTransfer",
            "followUpCall",
            "objectionHandling",
            "apologyRecovery",
            "delayHandling",
            "chatSupport",
            "emailScripts",
        ] {
            assert!(
                profile_for(category, "default").is_some(),
                "{category} missing default profile"
            );
        }
    }

    #[test]
    fn balances_are_normalized_weights() {
        for category in ["callOpening", "callClosing", "callHold"] {
            let profile = profile_for(category, "default").expect("default");
            let total = profile.balance.empathy + profile.balance.persuasion + profile.balance.authority;
            assert!((total - 1.0).abs() < 1e-6, "{category} balance sums to {total}");
        }
    }
}
