//! Declarative layer stacks driven by TOML configuration.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! Loaded { LayerStack, FormatOptions }
//!   ↓ Resolver::new()
//! per-file EffectiveConfig
//! ```

pub mod config_dto;
pub mod loader;

/// Errors from parsing TOML and loading a layer stack.
#[derive(Debug, thiserror::Error)]
pub enum LoadStackError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),
}

/// Parses TOML content into a validated stack and format options.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_from_toml(content: &str) -> Result<loader::Loaded, LoadStackError> {
    let dto: config_dto::ConfigDto = toml::from_str(content)?;
    Ok(loader::load(dto)?)
}
