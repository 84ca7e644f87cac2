use serde::{Deserialize, Deserializer, Serialize};

use super::request::ModificationType;

/// Structured triage of the source photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RoomAnalysis {
    #[serde(default, alias = "roomType")]
    pub room_type: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// What the architect capability is asked to plan from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectBrief {
    pub room_type: String,
    pub style: String,
    pub user_prompt: String,
    pub structural_elements_text: String,
    pub keep_elements: Vec<String>,
    pub modification_type: ModificationType,
    pub analysis: RoomAnalysis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectOutput {
    #[serde(default, alias = "structuralAnchors")]
    pub structural_anchors: Vec<String>,
    #[serde(default, alias = "styleVision")]
    pub style_vision: String,
    #[serde(
        default = "default_geometric_constraints",
        alias = "geometricConstraints",
        deserialize_with = "geometric_constraints_or_default"
    )]
    pub geometric_constraints: Vec<String>,
}

impl ArchitectOutput {
    /// Builds an output, substituting the default geometric constraints when
    /// none are supplied.
    pub fn new(
        structural_anchors: Vec<String>,
        style_vision: impl Into<String>,
        geometric_constraints: Option<Vec<String>>,
    ) -> Self {
        Self {
            structural_anchors,
            style_vision: style_vision.into(),
            geometric_constraints: geometric_constraints
                .filter(|rows| !rows.is_empty())
                .unwrap_or_else(default_geometric_constraints),
        }
    }
}

pub fn default_geometric_constraints() -> Vec<String> {
    vec![
        "Maintain the exact room proportions and wall positions".to_string(),
        "Keep every window and door opening in its original position and size".to_string(),
        "Preserve the original ceiling height".to_string(),
    ]
}

fn geometric_constraints_or_default<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Option<Vec<String>> = Option::deserialize(deserializer)?;
    let rows: Vec<String> = rows
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.trim().to_string())
        .filter(|row| !row.is_empty())
        .collect();
    if rows.is_empty() {
        return Ok(default_geometric_constraints());
    }
    Ok(rows)
}

/// The architect either hands back structure for the compiler or, when the
/// model output was unusable, a ready-to-send prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchitectResult {
    Structured(ArchitectOutput),
    Locked(String),
}
