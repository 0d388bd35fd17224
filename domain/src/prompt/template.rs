//! Prompt template for explanation requests

use crate::core::request::ExplanationRequest;

/// Builds the single-turn prompt sent to the generation API.
pub struct PromptTemplate;

impl PromptTemplate {
    /// Embed the selection and page metadata into the explanation template.
    ///
    /// The result is plain text payload; nothing in it is escaped.
    pub fn explanation(request: &ExplanationRequest) -> String {
        format!(
            r#"You are an educational assistant whose goal is to maximize learning efficiency. Provide a detailed explanation of the selected text below that helps the learner understand it and remember it.

## Page information
- Title: "{title}"
- URL: {url}

## Selected text
"{text}"

## Guidelines for the explanation
1. **Background and context**: explain the context in which this text is used
2. **Key concepts**: describe the technical terms and important concepts it contains, with concrete examples
3. **Learning points**: explain why this content matters and how it can be applied
4. **Related knowledge**: offer related information and applications for a deeper understanding
5. **Memory tips**: suggest ways to make the content easier to remember

Aim for an explanation that lets the learner fully understand this text and retain it in long-term memory."#,
            title = request.page_title(),
            url = request.page_url(),
            text = request.selected_text(),
        )
    }
}
