//! Explanation request value object

use serde::{Deserialize, Serialize};

/// Metadata of the page the selection was made on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    pub title: String,
    pub url: String,
}

impl PageContext {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// A request to explain a piece of selected text (Value Object)
///
/// Created on user action and discarded once the response resolves.
/// The selected text is stored trimmed and is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationRequest {
    selected_text: String,
    context: PageContext,
}

impl ExplanationRequest {
    /// Try to create a request, returning None if the selection is blank
    pub fn try_new(selected_text: impl AsRef<str>, context: PageContext) -> Option<Self> {
        let trimmed = selected_text.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                selected_text: trimmed.to_string(),
                context,
            })
        }
    }

    pub fn selected_text(&self) -> &str {
        &self.selected_text
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    pub fn page_title(&self) -> &str {
        &self.context.title
    }

    pub fn page_url(&self) -> &str {
        &self.context.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_empty() {
        assert!(ExplanationRequest::try_new("", PageContext::default()).is_none());
        assert!(ExplanationRequest::try_new("  \n\t", PageContext::default()).is_none());
    }

    #[test]
    fn test_try_new_trims_selection() {
        let req = ExplanationRequest::try_new(
            "  ownership  ",
            PageContext::new("The Book", "https://doc.rust-lang.org/book/"),
        )
        .unwrap();
        assert_eq!(req.selected_text(), "ownership");
        assert_eq!(req.page_title(), "The Book");
        assert_eq!(req.page_url(), "https://doc.rust-lang.org/book/");
    }
}
