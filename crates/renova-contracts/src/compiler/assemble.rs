use super::stages::{MaterialSlots, SlotKind};

pub const SYSTEM_ROLE: &str = "ROLE: You are an expert interior architect and photorealistic \
architectural visualizer. You renovate the room shown in the reference photo without ever \
changing its architecture.";

pub const VISUAL_REFERENCE: &str = "VISUAL REFERENCE: The attached photo is the geometric \
ground truth. Use it ONLY for camera perspective, room volume and the position of structural \
elements. Do NOT copy its materials, colors, furniture or state of wear.";

pub const CAMERA_LOCK: &str =
    "Keep the exact camera position, focal length and perspective of the photo";

pub const CLEAN_SLATE_HEADER: &str = "CLEAN-SLATE REGENERATION (keep the shape, replace the \
material):\nThe elements below must keep their exact geometry, but their surfaces must be \
generated from scratch. Never reproduce their current condition from the photo.";

pub const WALL_OVERRIDE: &str = "WALL OVERRIDE: No constraint asks to keep the current walls. \
Repaint every wall completely, taking color and material from the design mission. If the \
design mission gives no clear wall treatment, use a warm neutral off-white. Ignore the current \
wall color, stains, wallpaper and marks in the photo.";

pub const EXECUTION_RULES: &str = "EXECUTION RULES:\n\
1. Geometry is locked: do not move, add or remove walls, windows, doors, stairs or the fireplace.\n\
2. Every surface receives brand-new materials consistent with the design mission.\n\
3. Remove all clutter, damage, stains and temporary objects visible in the photo.\n\
4. Furnish and decorate the room completely according to the design mission.";

pub const LIGHTING: &str = "LIGHTING & MATERIALS: Physically based rendering. Natural \
daylight from the existing openings balanced with warm interior fixtures, soft global \
illumination, accurate reflections and realistic PBR textures with roughness, normal and \
displacement detail on every material.";

pub const TECHNICAL_SPECS: &str = "TECHNICAL SPECS: Photorealistic interior photograph, \
full-frame camera, 24mm lens, eye-level, sharp focus, high dynamic range, 4K detail. No text, \
no watermark, no people.";

pub fn geometric_anchors(constraints: &[String]) -> String {
    let mut lines = vec![
        "GEOMETRIC ANCHORS (must not change):".to_string(),
        format!("- {CAMERA_LOCK}."),
    ];
    lines.extend(
        constraints
            .iter()
            .map(|constraint| constraint.trim())
            .filter(|constraint| !constraint.is_empty())
            .map(|constraint| format!("- {}.", constraint.trim_end_matches('.'))),
    );
    lines.join("\n")
}

fn slot_sentence(index: usize, slot: SlotKind, value: &str) -> String {
    match slot {
        SlotKind::Floor => format!(
            "{index}. FLOOR: Generate a pristine, clean {value} surface. It must cover the \
entire floor area, completely overriding any existing rugs or objects in the photo."
        ),
        SlotKind::Stairs => format!(
            "{index}. STAIRS: Rebuild the staircase as a brand-new {value}. Keep its exact \
position, footprint and step geometry, but render every tread, riser and railing with flawless \
new materials."
        ),
        SlotKind::Fireplace => format!(
            "{index}. FIREPLACE: Render the fireplace as a brand-new {value}. Preserve its \
position and proportions, but replace any soot, stains or wear with a clean, freshly finished \
material."
        ),
    }
}

fn unmatched_sentence(index: usize, constraint: &str) -> String {
    format!(
        "{index}. {constraint}: Re-generate this element from scratch in its exact position \
and shape, with a fresh finish that matches the new design style."
    )
}

/// Empty when there is nothing to regenerate.
pub fn clean_slate(slots: &MaterialSlots, unmatched: &[String]) -> String {
    if slots.is_empty() && unmatched.is_empty() {
        return String::new();
    }
    let mut lines = vec![CLEAN_SLATE_HEADER.to_string()];
    for (slot, value) in slots.filled() {
        lines.push(slot_sentence(lines.len(), slot, value));
    }
    for constraint in unmatched {
        lines.push(unmatched_sentence(lines.len(), constraint));
    }
    lines.join("\n")
}

pub fn wall_override(walls_preserved: bool) -> Option<String> {
    if walls_preserved {
        return None;
    }
    Some(WALL_OVERRIDE.to_string())
}
