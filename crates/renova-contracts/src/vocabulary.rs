//! Static dictionaries used by the constraint compiler.
//!
//! Declaration order is part of the contract for `TRANSLATIONS` (output join
//! order) and `SEMANTIC_NORMALIZATION` (later rows may rewrite text produced by
//! earlier rows in the same pass). Do not sort these tables.

/// Source-language term → canonical English phrase. Matched as a
/// case-insensitive substring of the whole anchor, padded with one space on
/// each side, so a key with surrounding spaces only matches a whole word.
pub const TRANSLATIONS: &[(&str, &str)] = &[
    ("caminetto", "fireplace"),
    ("camino", "fireplace"),
    ("cotto", "terracotta tiled floor"),
    ("pavimento", "floor surface"),
    ("parquet", "wooden parquet floor"),
    ("piastrelle", "ceramic tiles"),
    ("scala", "staircase"),
    ("gradini", "stair steps"),
    ("ringhiera", "stair railing"),
    ("travi", "exposed wooden ceiling beams"),
    ("soffitto", "ceiling"),
    ("pareti", "walls"),
    ("parete", "wall"),
    ("muri", "walls"),
    ("muro", "wall"),
    ("mattoni", "exposed brick"),
    ("pietra", "natural stone"),
    ("marmo", "marble"),
    ("legno", "wood"),
    ("finestre", "windows"),
    ("finestra", "window"),
    (" porta ", "door"),
    ("arco", "arched opening"),
    ("colonna", "column"),
    ("pilastro", "pillar"),
];

/// Words that make image models animate or blur an element. Removed as whole
/// words.
pub const MOTION_TERMS: &[&str] = &[
    "spinning",
    "rotating",
    "rotation",
    "revolving",
    "moving",
    "turning",
    "swirling",
    "swinging",
    "flying",
    "floating",
    "falling",
    "rotante",
    "girevole",
];

/// Phrase → canonical semantic category. Applied in order as
/// case-insensitive substring replacement.
pub const SEMANTIC_NORMALIZATION: &[(&str, &str)] = &[
    ("floor surface", "floor material finish"),
    ("wooden floor", "wood plank floor"),
    ("wood plank floor", "hardwood plank floor"),
    ("wooden parquet floor", "wood parquet floor finish"),
    ("exposed brick", "exposed brick wall"),
    ("natural stone", "natural stone cladding"),
    ("stair steps", "staircase steps"),
    ("stair railing", "staircase railing"),
    ("mantelpiece", "fireplace mantel"),
    ("chimney breast", "fireplace chimney breast"),
    ("exposed wooden ceiling beams", "exposed ceiling beams structure"),
    ("window frame", "window opening"),
];

/// Leading prefix removed by the normalize stage.
pub const NORMALIZED_LEADING_PREFIX: &str = "existing ";

/// Fragment separators used when splitting normalized constraints.
pub const PUNCTUATION_SEPARATORS: &[char] = &[',', ';'];
pub const CONJUNCTION_SEPARATORS: &[&str] = &[" and ", " e "];

/// Slot keyword sets, checked in this order: floor, stairs, fireplace.
pub const FLOOR_KEYWORDS: &[&str] = &["floor", "parquet", "pavimento", "pavement"];
pub const STAIR_KEYWORDS: &[&str] = &["stair", "scala", "gradini", "ringhiera"];
pub const FIREPLACE_KEYWORDS: &[&str] = &[
    "fireplace",
    "camino",
    "caminetto",
    "hearth",
    "mantel",
    "chimney",
];

/// A normalized constraint containing any of these preserves the walls.
pub const WALL_KEYWORDS: &[&str] = &["wall", "parete", "pareti", "muro", "muri"];

/// Prefixes stripped from slot values, repeatedly, case-insensitively.
pub const SLOT_PREFIXES: &[&str] = &[
    "user constraints:",
    "existing",
    "original",
    "current",
    "esistente",
    "originale",
    "attuale",
];

/// Condition adjectives that would make the model reproduce damage.
pub const CONDITION_QUALIFIERS: &[&str] = &[
    "old",
    "damaged",
    "dirty",
    "worn",
    "stained",
    "cracked",
    "broken",
    "vecchio",
    "vecchia",
    "vecchi",
    "vecchie",
    "rovinato",
    "rovinata",
    "danneggiato",
    "danneggiata",
    "sporco",
    "sporca",
    "usurato",
    "usurata",
    "macchiato",
    "macchiata",
    "crepato",
    "crepata",
    "rotto",
    "rotta",
];

/// One trailing word from this list is dropped from slot values.
pub const SLOT_SUFFIXES: &[&str] = &["structure", "finish", "surface"];

/// A slot value reduced to exactly one of these carries no material
/// information and is discarded.
pub const GENERIC_TERMS: &[&str] = &["floor", "staircase", "fireplace", "wall", "ceiling"];
