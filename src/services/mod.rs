pub mod gemini;
pub mod parser;
pub mod prompt;
pub mod recommendations;
pub mod scoring;
