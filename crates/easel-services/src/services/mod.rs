pub mod extract;
pub mod gemini;
pub mod generation;
pub mod prompt;
