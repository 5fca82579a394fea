use clap::Args;
use learncomms::audit::{
    assemble, resolve_parameters, GuideState, Mode, RawAuditReply, GUIDE_THRESHOLD,
};
use learncomms::error::AppError;
use serde_json::json;
use std::str::FromStr;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Audit mode to demonstrate: call, chat, or email
    #[arg(long, default_value = "chat")]
    pub(crate) mode: String,
    /// Use a customized QA guide instead of the built-in defaults
    #[arg(long)]
    pub(crate) with_guide: bool,
    /// Emit the full audit payload as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

/// Offline walk through the reconciliation pipeline: resolve the scoring
/// parameters, feed in a canned (deliberately messy) reply, and show how the
/// service repairs it. No network access involved.
pub(crate) fn run_audit_demo(args: DemoArgs) -> Result<(), AppError> {
    let mode =
        Mode::from_str(&args.mode).map_err(|err| AppError::validation(err.to_string()))?;

    let guide = args.with_guide.then(demo_guide);
    let resolved = resolve_parameters(guide.as_ref(), mode);

    let reply: RawAuditReply =
        serde_json::from_value(canned_reply(mode)).map_err(|err| {
            AppError::validation(format!("demo reply failed to deserialize: {err}"))
        })?;

    let result = assemble(mode, &resolved, reply);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result)
                .unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    println!("QA audit reconciliation demo ({mode} mode)");
    println!(
        "guide in use: {} (threshold {} parameters)",
        result.meta.using_guide, GUIDE_THRESHOLD
    );
    println!("final score: {}%", result.final_score);
    println!(
        "category scores: Language {}%, Soft Skills {}%, Process {}%",
        result.category_scores.language,
        result.category_scores.soft_skills,
        result.category_scores.process
    );
    println!();
    println!("parameter scores (canonical order):");
    for entry in &result.parameter_scores {
        println!(
            "  [{}] {} -> {} ({})",
            entry.category, entry.parameter, entry.score, entry.reason
        );
    }
    if !result.meta.invalid_params_returned_by_ai.is_empty() {
        println!();
        println!(
            "entries dropped for unknown parameter names: {:?}",
            result.meta.invalid_params_returned_by_ai
        );
    }

    Ok(())
}

/// A guide with enough parameters to clear the adoption threshold.
fn demo_guide() -> GuideState {
    serde_json::from_value(json!({
        "call": {
            "Language": ["Grammar", "Fluency"],
            "Soft Skills": ["Empathy / Reassurance"],
            "Process": ["Resolution accuracy"]
        },
        "chat": {
            "language": ["Grammar", "Tone / professional wording"],
            "soft": ["Empathy & acknowledgement"],
            "process": ["Resolution accuracy"]
        },
        "email": {
            "Language": ["Grammar accuracy", "Formatting & structure"],
            "Soft Skills": ["Professional greeting & closing"],
            "Process": ["Correct resolution / information"]
        }
    }))
    .unwrap_or_default()
}

/// Deliberately messy reply: a duplicate, an unknown parameter, an
/// out-of-range score, and a missing entry for the reconciler to backfill.
fn canned_reply(mode: Mode) -> serde_json::Value {
    let (first, second) = match mode {
        Mode::Call => ("Grammar", "Fluency"),
        Mode::Chat => ("Grammar", "Tone / professional wording"),
        Mode::Email => ("Grammar accuracy", "Formatting & structure"),
    };

    json!({
        "mode": mode.to_string(),
        "parameterScores": [
            { "category": "Language", "parameter": first, "score": 4, "reason": "consistently correct" },
            { "category": "Language", "parameter": first, "score": 1, "reason": "duplicate, must be ignored" },
            { "category": "Language", "parameter": second, "score": 9, "reason": "out of range, goes neutral" },
            { "category": "Language", "parameter": "Telepathy", "score": 5, "reason": "not a real parameter" }
        ],
        "errors": ["abrupt opening"],
        "feedback": ["acknowledge the customer before diving into fixes"],
        "actionPlan": [
            { "day": 1, "task": "practice opening with an acknowledgement line" },
            { "day": 2, "task": "review three past conversations for tone" }
        ]
    })
}
