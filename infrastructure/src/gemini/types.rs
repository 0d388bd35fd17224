//! Request body of the `generateContent` family of endpoints.

use explainer_domain::GenerationParams;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationParams,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestPart {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

/// Harm categories covered by [`SafetySetting::standard`].
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

impl SafetySetting {
    /// Block medium-and-above harm in every category.
    pub fn standard() -> Vec<SafetySetting> {
        HARM_CATEGORIES
            .into_iter()
            .map(|category| SafetySetting {
                category,
                threshold: "BLOCK_MEDIUM_AND_ABOVE",
            })
            .collect()
    }
}

impl GenerateContentRequest {
    /// A single-turn request carrying one text prompt.
    pub fn single_turn(
        prompt: &str,
        params: GenerationParams,
        safety_settings: Vec<SafetySetting>,
    ) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: params,
            safety_settings,
        }
    }
}
