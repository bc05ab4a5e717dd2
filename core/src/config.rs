use serde::{Deserialize, Serialize};
use serde_path_to_error as spte;

use crate::error::{Result, WorkoutError};

/// Decoder knobs. Defaults match what the upstream API actually sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Accept numbers sent as strings (`"60"`). Empty strings are always absent.
    pub numeric_strings: bool,
    /// Fail the decode when a repeat block contains another repeat block,
    /// instead of waiting for rendering to reject it.
    pub reject_nested_repeats: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            numeric_strings: true,
            reject_nested_repeats: false,
        }
    }
}

impl DecodeConfig {
    /// Strict variant: numbers must be JSON numbers, nested repeats rejected up front.
    pub fn strict() -> Self {
        Self {
            numeric_strings: false,
            reject_nested_repeats: true,
        }
    }

    pub fn from_json_str(json_str: &str) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_str(json_str);
        spte::deserialize(&mut de).map_err(|e| {
            let path = e.path().to_string();
            WorkoutError::malformed(path, e.into_inner().to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg = DecodeConfig::from_json_str(r#"{"reject_nested_repeats": true}"#).unwrap();
        assert!(cfg.numeric_strings);
        assert!(cfg.reject_nested_repeats);
    }

    #[test]
    fn wrong_type_reports_path() {
        let err = DecodeConfig::from_json_str(r#"{"numeric_strings": "yes"}"#).unwrap_err();
        match err {
            WorkoutError::MalformedInput { path, .. } => assert_eq!(path, "numeric_strings"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
