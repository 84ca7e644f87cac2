use anyhow::{bail, Context, Result};

use crate::render::{ArchitectBrief, ArchitectOutput, ArchitectResult, RoomAnalysis};

use super::templates::locked_prompt;

/// Drops a surrounding Markdown code fence, if any.
pub fn strip_json_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body
        .strip_prefix("json")
        .or_else(|| body.strip_prefix("JSON"))
        .unwrap_or(body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

pub fn parse_room_analysis(raw: &str) -> Result<RoomAnalysis> {
    let body = strip_json_fence(raw);
    if body.is_empty() {
        bail!("triage returned an empty reply");
    }
    let analysis: RoomAnalysis =
        serde_json::from_str(body).context("triage reply is not valid JSON")?;
    Ok(analysis)
}

/// Never fails: unusable replies degrade to a locked prompt.
pub fn parse_architect_reply(raw: &str, brief: &ArchitectBrief) -> ArchitectResult {
    let body = strip_json_fence(raw);
    let parsed = serde_json::from_str::<ArchitectOutput>(body).ok().filter(|output| {
        !output.style_vision.trim().is_empty() || !output.structural_anchors.is_empty()
    });
    match parsed {
        Some(mut output) => {
            output.structural_anchors = output
                .structural_anchors
                .into_iter()
                .map(|anchor| anchor.trim().to_string())
                .filter(|anchor| !anchor.is_empty())
                .collect();
            if output.style_vision.trim().is_empty() {
                output.style_vision = format!(
                    "A {} renovated in {} style.",
                    brief.room_type.trim(),
                    brief.style.trim()
                );
            }
            ArchitectResult::Structured(output)
        }
        None => ArchitectResult::Locked(locked_prompt(brief)),
    }
}
