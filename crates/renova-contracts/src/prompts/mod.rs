mod replies;
mod templates;

pub use replies::{parse_architect_reply, parse_room_analysis, strip_json_fence};
pub use templates::{
    architect_instruction, creation_prompt, default_description, fallback_prompt, locked_prompt,
    TRIAGE_INSTRUCTION,
};
