//! Provider capabilities an agent can be configured with

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder selection for optional capabilities (vision, image)
pub const NONE_PROVIDER: &str = "None";

/// Placeholder selection when a required capability has no providers at all
pub const NO_PROVIDERS: &str = "No providers";

/// A functional role a provider can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Language,
    Vision,
    Tts,
    Transcription,
    Image,
    Embeddings,
}

impl Capability {
    /// All capabilities in the order the form shows them
    pub const ALL: [Capability; 6] = [
        Capability::Language,
        Capability::Vision,
        Capability::Tts,
        Capability::Transcription,
        Capability::Image,
        Capability::Embeddings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Language => "language",
            Capability::Vision => "vision",
            Capability::Tts => "tts",
            Capability::Transcription => "transcription",
            Capability::Image => "image",
            Capability::Embeddings => "embeddings",
        }
    }

    /// Optional capabilities accept "None" as a real choice
    pub fn is_optional(&self) -> bool {
        matches!(self, Capability::Vision | Capability::Image)
    }

    /// Agent settings key holding the selected provider
    pub fn settings_key(&self) -> &'static str {
        match self {
            Capability::Language => "provider",
            Capability::Vision => "vision_provider",
            Capability::Tts => "tts_provider",
            Capability::Transcription => "transcription_provider",
            Capability::Image => "image_provider",
            Capability::Embeddings => "embeddings_provider",
        }
    }

    /// Placeholder used when nothing can be selected
    pub fn sentinel(&self) -> &'static str {
        if self.is_optional() {
            NONE_PROVIDER
        } else {
            NO_PROVIDERS
        }
    }
}

/// Whether a provider value is a placeholder rather than a real provider
pub fn is_sentinel(provider: &str) -> bool {
    provider.is_empty() || provider == NONE_PROVIDER || provider == NO_PROVIDERS
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "language" | "llm" => Ok(Capability::Language),
            "vision" => Ok(Capability::Vision),
            "tts" => Ok(Capability::Tts),
            "transcription" => Ok(Capability::Transcription),
            "image" => Ok(Capability::Image),
            "embeddings" => Ok(Capability::Embeddings),
            other => Err(format!("unknown capability: {}", other)),
        }
    }
}
