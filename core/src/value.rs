// core/src/value.rs
use serde::Serialize;

use crate::config::DecodeConfig;
use crate::error::Result;
use crate::vocab::{HrTarget, ValueUnits};
use crate::wire::{self, Fields, JsonObject};

/// Intensity target of a step: a point value, a start/end range, or both.
///
/// `start`/`end` form a range only when both are present. Nothing stops a
/// value from carrying a scalar and a range at the same time; rendering
/// prints the range first, then the scalar.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Value {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<ValueUnits>,
    /// HR averaging window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<HrTarget>,
}

impl Value {
    pub fn point(value: f64, units: Option<ValueUnits>) -> Self {
        Self {
            value: Some(value),
            units,
            ..Default::default()
        }
    }

    pub fn range(start: f64, end: f64, units: Option<ValueUnits>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            units,
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: HrTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn is_range(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn encode(&self) -> Result<JsonObject> {
        self.check_finite("")?;
        wire::encode_object(self)
    }

    pub fn decode(obj: &JsonObject) -> Result<Self> {
        Self::decode_with(obj, DecodeConfig::default())
    }

    pub fn decode_with(obj: &JsonObject, cfg: DecodeConfig) -> Result<Self> {
        Self::from_fields(&Fields::new(obj, cfg))
    }

    pub(crate) fn from_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            value: f.f64("value")?,
            start: f.f64("start")?,
            end: f.f64("end")?,
            units: f.token("units")?,
            target: f.token("target")?,
        })
    }

    pub fn to_json_string(&self) -> Result<String> {
        self.check_finite("")?;
        Ok(serde_json::to_string(self)?)
    }

    /// serde_json writes NaN and infinity as `null`; refuse them instead.
    pub(crate) fn check_finite(&self, path: &str) -> Result<()> {
        wire::ensure_finite(path, "value", self.value)?;
        wire::ensure_finite(path, "start", self.start)?;
        wire::ensure_finite(path, "end", self.end)
    }

    pub fn from_json_str(json_str: &str) -> Result<Self> {
        let root = wire::parse_object(json_str)?;
        Self::from_fields(&Fields::of(&root, String::new(), DecodeConfig::default())?)
    }

    /// One-line summary, e.g. `60% ftp`, `Z2 HR`, `90rpm Cadence`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let (Some(start), Some(end)) = (self.start, self.end) {
            out.push_str(&format!("{} - {} ", format_number(start), format_number(end)));
        }
        if let Some(v) = self.value {
            out.push_str(&self.format_value(v));
            out.push(' ');
        }
        if let Some(units) = self.units {
            out.push_str(units.label());
            out.push(' ');
        }
        if let Some(target) = self.target {
            out.push_str(&format!("hr={} ", target.as_str()));
        }
        out.trim().to_string()
    }

    fn format_value(&self, v: f64) -> String {
        let n = format_number(v);
        match self.units {
            Some(u) if u.is_percent() => format!("{n}%"),
            Some(u) if u.is_zone() => format!("Z{n}"),
            Some(ValueUnits::Watts) => format!("{n}W"),
            Some(ValueUnits::Cadence) => format!("{n}rpm"),
            _ => n,
        }
    }
}

/// Whole numbers print without a decimal part (`60`, not `60.0`).
pub fn format_number(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 {
        if x == 0.0 {
            return "0".to_string();
        }
        format!("{x:.0}")
    } else {
        format!("{x}")
    }
}
