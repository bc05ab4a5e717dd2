use serde::Serialize;

use crate::config::DecodeConfig;
use crate::error::Result;
use crate::wire::{self, display_path, Fields, JsonObject};

/// Sport-specific settings attached to a workout.
///
/// No fields are modelled yet: whatever the API sends is dropped on decode
/// and the settings always encode as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SportSettings {}

impl SportSettings {
    pub fn encode(&self) -> Result<JsonObject> {
        Ok(JsonObject::new())
    }

    pub fn decode(obj: &JsonObject) -> Result<Self> {
        Self::decode_with(obj, DecodeConfig::default())
    }

    pub fn decode_with(obj: &JsonObject, cfg: DecodeConfig) -> Result<Self> {
        Self::from_fields(&Fields::new(obj, cfg))
    }

    pub(crate) fn from_fields(f: &Fields<'_>) -> Result<Self> {
        if !f.raw().is_empty() {
            log::debug!(
                "discarding {} sport settings key(s) at {}",
                f.raw().len(),
                display_path(f.path())
            );
        }
        Ok(Self {})
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json_str(json_str: &str) -> Result<Self> {
        let root = wire::parse_object(json_str)?;
        Self::from_fields(&Fields::of(&root, String::new(), DecodeConfig::default())?)
    }
}
