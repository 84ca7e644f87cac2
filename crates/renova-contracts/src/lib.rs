pub mod compiler;
pub mod errors;
pub mod events;
pub mod prompts;
pub mod render;
pub mod vocabulary;
