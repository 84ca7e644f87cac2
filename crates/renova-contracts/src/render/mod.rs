mod architect;
mod outcome;
mod request;

pub use architect::{
    default_geometric_constraints, ArchitectBrief, ArchitectOutput, ArchitectResult, RoomAnalysis,
};
pub use outcome::{GenerationResult, GenerationSource, RenderOutcome};
pub use request::{ModificationType, RenderMode, RenderRequest, SourceImage};
