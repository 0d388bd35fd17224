//! Generation configuration from TOML (`[generation]` section)

use explainer_domain::GenerationParams;
use serde::{Deserialize, Serialize};

/// Raw sampling parameters from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    /// Attach `BLOCK_MEDIUM_AND_ABOVE` safety settings to every request
    pub safety_settings: bool,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            temperature: params.temperature,
            top_k: params.top_k,
            top_p: params.top_p,
            max_output_tokens: params.max_output_tokens,
            safety_settings: false,
        }
    }
}

impl FileGenerationConfig {
    pub fn to_params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            top_k: self.top_k,
            top_p: self.top_p,
            max_output_tokens: self.max_output_tokens,
        }
    }
}
