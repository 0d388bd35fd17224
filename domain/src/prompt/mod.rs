//! Prompt domain
//!
//! The fixed instructional template the selected text is embedded into.

mod template;

pub use template::PromptTemplate;
