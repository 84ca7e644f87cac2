//! Turns the architect's "keep this" anchors into the structured generation
//! prompt.
//!
//! The compiler is a pure function of [`ArchitectOutput`]. Stage order is
//! fixed: translate → desensitize → normalize (per anchor, see
//! [`StagePipeline::anchors`]) → tokenize → categorize → sanitize → assemble.

mod assemble;
mod stages;
mod text;

use std::fmt;

use serde::Serialize;

use crate::render::ArchitectOutput;

pub use assemble::{
    CAMERA_LOCK, CLEAN_SLATE_HEADER, EXECUTION_RULES, LIGHTING, SYSTEM_ROLE, TECHNICAL_SPECS,
    VISUAL_REFERENCE, WALL_OVERRIDE,
};
pub use stages::{
    categorize, mentions_walls, sanitize, sanitize_slot_value, tokenize, Desensitize,
    MaterialSlots, Normalize, SlotKind, StagePipeline, TextStage, Translate,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledPrompt {
    pub system_role: String,
    pub visual_reference: String,
    pub geometric_anchors: String,
    /// Empty when no slot survived sanitizing and nothing was unmatched.
    pub clean_slate: String,
    /// Present only when no constraint preserves the walls.
    pub wall_override: Option<String>,
    pub design_mission: String,
    pub execution_rules: String,
    pub lighting: String,
    pub technical_specs: String,
}

impl CompiledPrompt {
    /// Sections in prompt order, empty ones skipped.
    pub fn sections(&self) -> Vec<&str> {
        [
            self.system_role.as_str(),
            self.visual_reference.as_str(),
            self.geometric_anchors.as_str(),
            self.clean_slate.as_str(),
            self.wall_override.as_deref().unwrap_or_default(),
            self.design_mission.as_str(),
            self.execution_rules.as_str(),
            self.lighting.as_str(),
            self.technical_specs.as_str(),
        ]
        .into_iter()
        .filter(|section| !section.trim().is_empty())
        .collect()
    }

    pub fn text(&self) -> String {
        self.sections().join("\n\n")
    }
}

impl fmt::Display for CompiledPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Every intermediate value of one compilation, for debugging and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilationTrace {
    pub translated: Vec<String>,
    pub desensitized: Vec<String>,
    pub normalized: Vec<String>,
    pub atomic_constraints: Vec<String>,
    pub raw_slots: MaterialSlots,
    pub unmatched: Vec<String>,
    pub slots: MaterialSlots,
    pub walls_preserved: bool,
    pub prompt: CompiledPrompt,
}

pub fn compile(output: &ArchitectOutput) -> CompiledPrompt {
    compile_with_trace(output).prompt
}

pub fn compile_with_trace(output: &ArchitectOutput) -> CompilationTrace {
    let pipeline = StagePipeline::anchors();
    let mut translated = Vec::with_capacity(output.structural_anchors.len());
    let mut desensitized = Vec::with_capacity(output.structural_anchors.len());
    let mut normalized = Vec::with_capacity(output.structural_anchors.len());
    for anchor in &output.structural_anchors {
        let mut stage_outputs = pipeline.run(anchor).into_iter();
        translated.push(stage_outputs.next().unwrap_or_default());
        desensitized.push(stage_outputs.next().unwrap_or_default());
        normalized.push(stage_outputs.next().unwrap_or_default());
    }

    let atomic_constraints = tokenize(&normalized);
    let (raw_slots, unmatched) = categorize(&atomic_constraints);
    let slots = sanitize(&raw_slots);
    let walls_preserved = mentions_walls(&normalized);

    let prompt = CompiledPrompt {
        system_role: SYSTEM_ROLE.to_string(),
        visual_reference: VISUAL_REFERENCE.to_string(),
        geometric_anchors: assemble::geometric_anchors(&output.geometric_constraints),
        clean_slate: assemble::clean_slate(&slots, &unmatched),
        wall_override: assemble::wall_override(walls_preserved),
        design_mission: output.style_vision.clone(),
        execution_rules: EXECUTION_RULES.to_string(),
        lighting: LIGHTING.to_string(),
        technical_specs: TECHNICAL_SPECS.to_string(),
    };

    CompilationTrace {
        translated,
        desensitized,
        normalized,
        atomic_constraints,
        raw_slots,
        unmatched,
        slots,
        walls_preserved,
        prompt,
    }
}
