// src/services/biography.rs
use crate::config::ConfigError;

pub const DEFAULT_BIOGRAPHY: &str = include_str!("../../assets/biography.txt");

/// Read the biography from `path`, or fall back to the compiled-in one.
pub fn load(path: Option<&str>) -> Result<String, ConfigError> {
    let Some(path) = path else {
        return Ok(DEFAULT_BIOGRAPHY.trim().to_string());
    };

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Biography {
        path: path.to_string(),
        source,
    })?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ConfigError::EmptyBiography(path.to_string()));
    }
    Ok(text.to_string())
}

/// System message sent ahead of every user question.
pub fn system_prompt(biography: &str) -> String {
    format!(
        "You are a friendly assistant on a personal portfolio website. \
         Answer visitors' questions using only the biography below. \
         If the answer is not in the biography, say you don't know and suggest \
         using the contact form. Keep answers short and conversational.\n\n\
         Biography:\n{biography}"
    )
}
