use serde::Serialize;

use crate::vocabulary::{
    FIREPLACE_KEYWORDS, FLOOR_KEYWORDS, GENERIC_TERMS, STAIR_KEYWORDS, TRANSLATIONS,
    WALL_KEYWORDS,
};

use super::text::{
    capitalize_first, collapse_whitespace, contains_any_ignore_case, contains_ignore_case,
    patterns,
};

/// One per-anchor string transformation.
pub trait TextStage: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, input: &str) -> String;
}

pub struct Translate;

impl TextStage for Translate {
    fn name(&self) -> &'static str {
        "translate"
    }

    fn apply(&self, input: &str) -> String {
        let padded = format!(" {input} ");
        let matched: Vec<&str> = TRANSLATIONS
            .iter()
            .filter(|(term, _)| contains_ignore_case(&padded, term))
            .map(|(_, english)| *english)
            .collect();
        if matched.is_empty() {
            return input.to_string();
        }
        matched.join(" and ")
    }
}

pub struct Desensitize;

impl TextStage for Desensitize {
    fn name(&self) -> &'static str {
        "desensitize"
    }

    fn apply(&self, input: &str) -> String {
        let Some(patterns) = patterns() else {
            return input.to_string();
        };
        collapse_whitespace(&patterns.motion_terms.replace_all(input, ""))
    }
}

pub struct Normalize;

impl TextStage for Normalize {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn apply(&self, input: &str) -> String {
        let Some(patterns) = patterns() else {
            return capitalize_first(input.trim());
        };
        let replaced = patterns
            .normalization
            .iter()
            .fold(input.to_string(), |text, rule| rule.apply(&text));
        // Strip `existing ` before capitalizing, so `Existing ...` loses it too.
        let unprefixed = patterns.leading_existing.replace(replaced.trim(), "");
        capitalize_first(unprefixed.trim())
    }
}

/// Ordered list of named text stages applied to every anchor.
pub struct StagePipeline {
    stages: Vec<Box<dyn TextStage>>,
}

impl StagePipeline {
    pub fn new(stages: Vec<Box<dyn TextStage>>) -> Self {
        Self { stages }
    }

    /// translate → desensitize → normalize.
    pub fn anchors() -> Self {
        Self::new(vec![
            Box::new(Translate),
            Box::new(Desensitize),
            Box::new(Normalize),
        ])
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Output of every stage, in order. The last entry is the final value.
    pub fn run(&self, input: &str) -> Vec<String> {
        let mut outputs: Vec<String> = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let previous = outputs.last().map(String::as_str).unwrap_or(input);
            let next = stage.apply(previous);
            outputs.push(next);
        }
        outputs
    }
}

/// Flattens normalized constraints into atomic constraints.
pub fn tokenize(normalized: &[String]) -> Vec<String> {
    let Some(patterns) = patterns() else {
        return normalized.to_vec();
    };
    normalized
        .iter()
        .flat_map(|constraint| patterns.separators.split(constraint))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Floor,
    Stairs,
    Fireplace,
}

impl SlotKind {
    /// Priority order used by categorization.
    pub const ALL: [SlotKind; 3] = [SlotKind::Floor, SlotKind::Stairs, SlotKind::Fireplace];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Floor => FLOOR_KEYWORDS,
            Self::Stairs => STAIR_KEYWORDS,
            Self::Fireplace => FIREPLACE_KEYWORDS,
        }
    }

    pub fn classify(constraint: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|slot| contains_any_ignore_case(constraint, slot.keywords()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MaterialSlots {
    pub floor: Option<String>,
    pub stairs: Option<String>,
    pub fireplace: Option<String>,
}

impl MaterialSlots {
    pub fn get(&self, slot: SlotKind) -> Option<&str> {
        match slot {
            SlotKind::Floor => self.floor.as_deref(),
            SlotKind::Stairs => self.stairs.as_deref(),
            SlotKind::Fireplace => self.fireplace.as_deref(),
        }
    }

    fn slot_mut(&mut self, slot: SlotKind) -> &mut Option<String> {
        match slot {
            SlotKind::Floor => &mut self.floor,
            SlotKind::Stairs => &mut self.stairs,
            SlotKind::Fireplace => &mut self.fireplace,
        }
    }

    /// Writes the slot unless it already holds a value. Returns whether the
    /// value was stored.
    pub fn fill(&mut self, slot: SlotKind, value: &str) -> bool {
        let target = self.slot_mut(slot);
        if target.is_some() {
            return false;
        }
        *target = Some(value.to_string());
        true
    }

    pub fn is_empty(&self) -> bool {
        SlotKind::ALL.iter().all(|slot| self.get(*slot).is_none())
    }

    pub fn filled(&self) -> impl Iterator<Item = (SlotKind, &str)> + '_ {
        SlotKind::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|value| (slot, value)))
    }
}

/// Assigns atomic constraints to slots, first match wins. Constraints that
/// hit an occupied slot are discarded; ones that hit no slot are returned.
pub fn categorize(atoms: &[String]) -> (MaterialSlots, Vec<String>) {
    let mut slots = MaterialSlots::default();
    let mut unmatched = Vec::new();
    for atom in atoms {
        match SlotKind::classify(atom) {
            Some(slot) => {
                slots.fill(slot, atom);
            }
            None => unmatched.push(atom.clone()),
        }
    }
    (slots, unmatched)
}

/// Cleans one slot value. `None` when nothing material-specific is left.
pub fn sanitize_slot_value(value: &str) -> Option<String> {
    let patterns = patterns()?;
    let text = collapse_whitespace(value);
    let text = patterns.slot_prefixes.replace(&text, "");
    let text = collapse_whitespace(&patterns.condition_qualifiers.replace_all(&text, ""));
    let text = collapse_whitespace(&patterns.slot_suffix.replace(&text, ""));
    if text.is_empty() {
        return None;
    }
    if GENERIC_TERMS
        .iter()
        .any(|generic| text.eq_ignore_ascii_case(generic))
    {
        return None;
    }
    Some(text)
}

pub fn sanitize(slots: &MaterialSlots) -> MaterialSlots {
    MaterialSlots {
        floor: slots.floor.as_deref().and_then(sanitize_slot_value),
        stairs: slots.stairs.as_deref().and_then(sanitize_slot_value),
        fireplace: slots.fireplace.as_deref().and_then(sanitize_slot_value),
    }
}

/// Whether any normalized constraint talks about walls.
pub fn mentions_walls(normalized: &[String]) -> bool {
    normalized
        .iter()
        .any(|constraint| contains_any_ignore_case(constraint, WALL_KEYWORDS))
}
