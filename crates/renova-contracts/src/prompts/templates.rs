use crate::render::{ArchitectBrief, ModificationType};

pub const TRIAGE_INSTRUCTION: &str = "You are an interior surveyor. Analyse the attached room \
photo and answer with JSON only, no prose, using exactly this shape:\n\
{\"room_type\": string, \"materials\": [string], \"features\": [string]}\n\
`materials` lists the visible finishes (floor, walls, stairs, fireplace). `features` lists \
fixed architectural elements such as beams, arches, niches, stairs or a fireplace.";

pub fn architect_instruction(brief: &ArchitectBrief) -> String {
    let keep = if brief.keep_elements.is_empty() {
        "none specified".to_string()
    } else {
        brief.keep_elements.join("; ")
    };
    let scope = match brief.modification_type {
        ModificationType::Renovation => {
            "Plan a full renovation: every finish and all furniture may change, the architecture may not."
        }
        ModificationType::Detail => {
            "Plan a detail change: alter only what the client asks for and leave everything else exactly as in the photo."
        }
    };
    let mut lines = vec![
        "You are the lead architect of a renovation studio. Study the attached photo and plan \
its transformation."
            .to_string(),
        format!("Room type: {}", brief.room_type.trim()),
        format!("Target style: {}", brief.style.trim()),
        format!("Client request: {}", non_empty_or(&brief.user_prompt, "none")),
        format!("Elements the client wants to keep: {keep}"),
    ];
    if !brief.structural_elements_text.trim().is_empty() {
        lines.push(format!(
            "Structural notes from the client: {}",
            brief.structural_elements_text.trim()
        ));
    }
    if !brief.analysis.materials.is_empty() || !brief.analysis.features.is_empty() {
        lines.push(format!(
            "Survey: materials [{}]; features [{}]",
            brief.analysis.materials.join(", "),
            brief.analysis.features.join(", ")
        ));
    }
    lines.push(scope.to_string());
    lines.push(
        "Answer with JSON only, using exactly this shape:\n\
{\"structural_anchors\": [string], \"style_vision\": string, \"geometric_constraints\": [string]}\n\
`structural_anchors` lists the physical elements that must keep their shape and position. \
`style_vision` is one paragraph describing the finished room. `geometric_constraints` lists \
the proportions and openings that must not move."
            .to_string(),
    );
    lines.join("\n")
}

/// Prompt used when the architect gives back nothing usable.
pub fn locked_prompt(brief: &ArchitectBrief) -> String {
    format!(
        "Renovate this {} in {} style. Keep the exact camera perspective, room proportions, \
windows, doors and ceiling height of the photo. Replace every finish and all furniture with \
brand-new, photorealistic materials. {}",
        brief.room_type.trim(),
        brief.style.trim(),
        non_empty_or(&brief.user_prompt, "")
    )
    .trim_end()
    .to_string()
}

/// Template for text-only generation. The fallback path passes no
/// structural elements.
pub fn creation_prompt(
    room_type: &str,
    style: &str,
    prompt: &str,
    structural_elements: Option<&str>,
) -> String {
    let mut lines = vec![format!(
        "Photorealistic interior photograph of a {} designed in {} style.",
        room_type.trim(),
        style.trim()
    )];
    if !prompt.trim().is_empty() {
        lines.push(format!("Client request: {}", prompt.trim()));
    }
    if let Some(elements) = structural_elements
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        lines.push(format!("Include these architectural elements: {elements}"));
    }
    lines.push(
        "Eye-level view, 24mm lens, natural daylight balanced with warm interior lighting, \
realistic PBR materials, high dynamic range, 4K detail. No text, no watermark, no people."
            .to_string(),
    );
    lines.join("\n")
}

pub fn fallback_prompt(room_type: &str, style: &str, prompt: &str) -> String {
    creation_prompt(room_type, style, prompt, None)
}

pub fn default_description(room_type: &str, style: &str) -> String {
    format!(
        "Photorealistic {} {} rendering.",
        style.trim(),
        room_type.trim()
    )
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RoomAnalysis;

    fn brief() -> ArchitectBrief {
        ArchitectBrief {
            room_type: "living room".to_string(),
            style: "japandi".to_string(),
            user_prompt: "more light".to_string(),
            structural_elements_text: String::new(),
            keep_elements: vec!["camino".to_string(), "travi".to_string()],
            modification_type: ModificationType::Renovation,
            analysis: RoomAnalysis {
                room_type: "living room".to_string(),
                materials: vec!["terracotta".to_string()],
                features: vec!["fireplace".to_string()],
            },
        }
    }

    #[test]
    fn fallback_prompt_uses_only_room_style_and_prompt() {
        let prompt = fallback_prompt("kitchen", "industrial", "black steel");
        assert!(prompt.starts_with(
            "Photorealistic interior photograph of a kitchen designed in industrial style."
        ));
        assert!(prompt.contains("Client request: black steel"));
        assert!(!prompt.contains("architectural elements"));
    }

    #[test]
    fn creation_prompt_adds_structural_elements() {
        let prompt = creation_prompt("loft", "minimal", "", Some("spiral staircase"));
        assert!(prompt.contains("Include these architectural elements: spiral staircase"));
        assert!(!prompt.contains("Client request"));
    }

    #[test]
    fn architect_instruction_lists_keep_elements_and_scope() {
        let text = architect_instruction(&brief());
        assert!(text.contains("Elements the client wants to keep: camino; travi"));
        assert!(text.contains("Survey: materials [terracotta]; features [fireplace]"));
        assert!(text.contains("Plan a full renovation"));

        let mut detail = brief();
        detail.modification_type = ModificationType::Detail;
        detail.keep_elements.clear();
        let text = architect_instruction(&detail);
        assert!(text.contains("Plan a detail change"));
        assert!(text.contains("keep: none specified"));
    }

    #[test]
    fn locked_prompt_is_templated_from_brief() {
        assert_eq!(
            locked_prompt(&brief()),
            "Renovate this living room in japandi style. Keep the exact camera perspective, room \
proportions, windows, doors and ceiling height of the photo. Replace every finish and all \
furniture with brand-new, photorealistic materials. more light"
        );
    }
}
