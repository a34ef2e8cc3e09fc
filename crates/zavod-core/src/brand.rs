use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

pub const DEFAULT_TEMPLATE_ID: &str = "base/slides/tutorial-carousel";

/// Brand or expert identity applied at export time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandProfile {
    pub id: String,
    pub name: String,
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub expert_name: String,
    #[serde(default)]
    pub expert_photo_url: String,
    #[serde(default)]
    pub blotato_template_id: Option<String>,
    #[serde(default)]
    pub style_hint: Option<String>,
}

fn default_primary_color() -> String {
    "#6C5CE7".to_string()
}

fn default_secondary_color() -> String {
    "#FFFFFF".to_string()
}

fn default_font_family() -> String {
    "Inter".to_string()
}

impl Default for BrandProfile {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            name: "WB Expert".to_string(),
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
            font_family: default_font_family(),
            expert_name: "WB Expert".to_string(),
            expert_photo_url: String::new(),
            blotato_template_id: Some(DEFAULT_TEMPLATE_ID.to_string()),
            style_hint: Some(
                "Современный, чистый, минималистичный стиль для предпринимателей.".to_string(),
            ),
        }
    }
}

/// Load and validate a brand profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_brand_profile(path: &Path) -> Result<BrandProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BrandProfileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profile: BrandProfile =
        serde_yaml::from_str(&content).map_err(ConfigError::BrandProfileParse)?;

    validate_brand_profile(&profile)?;

    Ok(profile)
}

/// Load the profile at `path` when one is configured, otherwise the built-in default.
///
/// # Errors
///
/// Propagates [`load_brand_profile`] errors for a configured path.
pub fn resolve_brand_profile(path: Option<&Path>) -> Result<BrandProfile, ConfigError> {
    path.map_or_else(|| Ok(BrandProfile::default()), load_brand_profile)
}

fn validate_brand_profile(profile: &BrandProfile) -> Result<(), ConfigError> {
    if profile.id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "brand profile id must be non-empty".to_string(),
        ));
    }
    if profile.name.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "brand profile '{}' must have a non-empty name",
            profile.id
        )));
    }
    for (field, value) in [
        ("primary_color", &profile.primary_color),
        ("secondary_color", &profile.secondary_color),
    ] {
        if !is_hex_color(value) {
            return Err(ConfigError::Validation(format!(
                "brand profile '{}' has invalid {field} '{value}'; expected #RRGGBB",
                profile.id
            )));
        }
    }
    Ok(())
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_yaml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_sample_profile_from_config_dir() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/brand_profile.yaml");
        let profile = load_brand_profile(&path).unwrap();
        assert_eq!(profile.id, "wb-expert-01");
        assert_eq!(profile.blotato_template_id.as_deref(), Some(DEFAULT_TEMPLATE_ID));
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let file = write_yaml("id: acme\nname: Acme\n");
        let profile = load_brand_profile(file.path()).unwrap();
        assert_eq!(profile.primary_color, "#6C5CE7");
        assert_eq!(profile.font_family, "Inter");
        assert!(profile.blotato_template_id.is_none());
        assert!(profile.style_hint.is_none());
    }

    #[test]
    fn rejects_empty_name() {
        let file = write_yaml("id: acme\nname: '  '\n");
        let err = load_brand_profile(file.path()).unwrap_err();
        assert!(err.to_string().contains("non-empty name"));
    }

    #[test]
    fn rejects_bad_color() {
        let file = write_yaml("id: acme\nname: Acme\nprimary_color: purple\n");
        let err = load_brand_profile(file.path()).unwrap_err();
        assert!(err.to_string().contains("primary_color"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_brand_profile(Path::new("/nonexistent/brand.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::BrandProfileIo { .. }));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let file = write_yaml("id: [unterminated\n");
        let err = load_brand_profile(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::BrandProfileParse(_)));
    }

    #[test]
    fn resolve_without_path_uses_default() {
        let profile = resolve_brand_profile(None).unwrap();
        assert_eq!(profile, BrandProfile::default());
        assert!(validate_brand_profile(&profile).is_ok());
    }
}
