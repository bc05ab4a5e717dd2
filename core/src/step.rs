// core/src/step.rs
use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::DecodeConfig;
use crate::error::{Result, WorkoutError};
use crate::value::{format_number, Value};
use crate::vocab::Intensity;
use crate::wire::{self, display_path, Fields, JsonObject};

/// One node of the workout tree.
///
/// By convention a node is either a leaf (duration/distance + targets, no
/// `reps`) or a repeat block (`reps` + child `steps`). The struct keeps the
/// flat wire shape so any combination the API sends survives a round trip;
/// [`Step::kind`] gives the typed view.
///
/// The `resolved_*` fields (`_power`, `_hr`, `_pace`, `_distance` on the wire)
/// are filled in by the API when a workout is fetched with `resolve=true`.
/// This crate only carries them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Step {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_locale: Option<BTreeMap<String, String>>,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until_lap_press: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ramp: Option<bool>,
    /// No ERG control for this section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeride: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxeffort: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hr: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidepower: Option<bool>,
    #[serde(rename = "_power", skip_serializing_if = "Option::is_none")]
    pub resolved_power: Option<Value>,
    #[serde(rename = "_hr", skip_serializing_if = "Option::is_none")]
    pub resolved_hr: Option<Value>,
    #[serde(rename = "_pace", skip_serializing_if = "Option::is_none")]
    pub resolved_pace: Option<Value>,
    #[serde(rename = "_distance", skip_serializing_if = "Option::is_none")]
    pub resolved_distance: Option<f64>,
}

/// Typed view of a [`Step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepKind<'a> {
    Leaf(&'a Step),
    Repeat { reps: i64, steps: &'a [Step] },
}

impl Step {
    pub fn leaf() -> Self {
        Self::default()
    }

    pub fn repeat(reps: i64, steps: Vec<Step>) -> Self {
        Self {
            reps: Some(reps),
            steps: Some(steps),
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, secs: i64) -> Self {
        self.duration = Some(secs);
        self
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.distance = Some(meters);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn with_power(mut self, power: Value) -> Self {
        self.power = Some(power);
        self
    }

    pub fn with_hr(mut self, hr: Value) -> Self {
        self.hr = Some(hr);
        self
    }

    pub fn with_pace(mut self, pace: Value) -> Self {
        self.pace = Some(pace);
        self
    }

    pub fn with_cadence(mut self, cadence: Value) -> Self {
        self.cadence = Some(cadence);
        self
    }

    pub fn as_warmup(mut self) -> Self {
        self.warmup = Some(true);
        self
    }

    pub fn as_cooldown(mut self) -> Self {
        self.cooldown = Some(true);
        self
    }

    pub fn with_ramp(mut self) -> Self {
        self.ramp = Some(true);
        self
    }

    pub fn with_freeride(mut self) -> Self {
        self.freeride = Some(true);
        self
    }

    pub fn with_maxeffort(mut self) -> Self {
        self.maxeffort = Some(true);
        self
    }

    pub fn kind(&self) -> StepKind<'_> {
        match self.reps {
            Some(reps) => StepKind::Repeat {
                reps,
                steps: self.steps.as_deref().unwrap_or(&[]),
            },
            None => StepKind::Leaf(self),
        }
    }

    /// Rejects a repeat block whose direct child is a repeat block, at any
    /// depth of the tree. Same rule as `DecodeConfig::reject_nested_repeats`.
    ///
    /// `to_text` only walks a repeat block's direct children, so a tree that
    /// passes here always renders; it may also render trees that fail here
    /// when the offending block sits under a leaf's ignored `steps`.
    pub fn check_structure(&self) -> Result<()> {
        if let Some(child) = self.nested_repeat() {
            return Err(nested_repeat_error(child));
        }
        self.steps.iter().flatten().try_for_each(Step::check_structure)
    }

    fn nested_repeat(&self) -> Option<&Step> {
        self.reps?;
        self.steps.iter().flatten().find(|c| c.reps.is_some())
    }

    /// Number of leaf intervals this node expands to (repeat blocks multiply).
    /// Saturates at `i64::MAX`.
    pub fn leaf_count(&self) -> i64 {
        match self.kind() {
            StepKind::Leaf(_) => 1,
            StepKind::Repeat { reps, steps } => reps.max(0).saturating_mul(
                steps
                    .iter()
                    .map(Step::leaf_count)
                    .fold(0, i64::saturating_add),
            ),
        }
    }

    /// Fails on a number that cannot go on the wire (NaN, infinity).
    pub(crate) fn check_finite(&self, path: &str) -> Result<()> {
        wire::ensure_finite(path, "distance", self.distance)?;
        wire::ensure_finite(path, "_distance", self.resolved_distance)?;
        for (key, target) in [
            ("power", &self.power),
            ("hr", &self.hr),
            ("pace", &self.pace),
            ("cadence", &self.cadence),
            ("_power", &self.resolved_power),
            ("_hr", &self.resolved_hr),
            ("_pace", &self.resolved_pace),
        ] {
            if let Some(v) = target {
                v.check_finite(&wire::join_path(path, key))?;
            }
        }
        for (i, child) in self.steps.iter().flatten().enumerate() {
            child.check_finite(&format!("{}[{i}]", wire::join_path(path, "steps")))?;
        }
        Ok(())
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
        let cfg = f.config();
        let step = Self {
            text: f.string("text")?,
            text_locale: f.string_map("text_locale")?,
            duration: f.i64("duration")?,
            distance: f.f64("distance")?,
            until_lap_press: f.bool("until_lap_press")?,
            reps: f.i64("reps")?,
            warmup: f.bool("warmup")?,
            cooldown: f.bool("cooldown")?,
            intensity: f.token("intensity")?,
            steps: f.list("steps", |item, path| {
                Step::from_fields(&Fields::of(item, path, cfg)?)
            })?,
            ramp: f.bool("ramp")?,
            freeride: f.bool("freeride")?,
            maxeffort: f.bool("maxeffort")?,
            power: f.object("power", Value::from_fields)?,
            hr: f.object("hr", Value::from_fields)?,
            pace: f.object("pace", Value::from_fields)?,
            cadence: f.object("cadence", Value::from_fields)?,
            hidepower: f.bool("hidepower")?,
            resolved_power: f.object("_power", Value::from_fields)?,
            resolved_hr: f.object("_hr", Value::from_fields)?,
            resolved_pace: f.object("_pace", Value::from_fields)?,
            resolved_distance: f.f64("_distance")?,
        };
        if cfg.reject_nested_repeats {
            if let Some(child) = step.nested_repeat() {
                log::debug!("nested repeat rejected at {}", display_path(f.path()));
                return Err(nested_repeat_error(child));
            }
        }
        Ok(step)
    }

    pub fn to_json_string(&self) -> Result<String> {
        self.check_finite("")?;
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json_str(json_str: &str) -> Result<Self> {
        let root = wire::parse_object(json_str)?;
        Self::from_fields(&Fields::of(&root, String::new(), DecodeConfig::default())?)
    }

    /// Workout-builder text for this step (top level).
    pub fn to_text(&self) -> Result<String> {
        self.render(false)
    }

    /// Renders the step; `nested` is set for children of a repeat block,
    /// which get no warmup/cooldown headers and may not repeat themselves.
    pub fn render(&self, nested: bool) -> Result<String> {
        let warmup = self.warmup == Some(true);
        let cooldown = self.cooldown == Some(true);
        let mut out = String::new();

        if let Some(reps) = self.reps {
            if nested {
                return Err(nested_repeat_error(self));
            }
            out.push_str(&format!("\n{reps}x "));
        } else {
            if !nested && warmup {
                out.push_str("\nWarmup\n");
            }
            if !nested && cooldown {
                out.push_str("\nCooldown\n");
            }

            if let Some(secs) = self.duration {
                out.push_str(&format!("- {} ", format_duration(secs)));
            } else if let Some(meters) = self.distance {
                out.push_str(&format!("- {} ", format_distance(meters)));
            }

            for (flag, token) in [
                (self.freeride, "freeride"),
                (self.maxeffort, "maxeffort"),
                (self.ramp, "ramp"),
                (self.hidepower, "hidepower"),
            ] {
                if flag == Some(true) {
                    out.push_str(token);
                    out.push(' ');
                }
            }
            if let Some(intensity) = self.intensity {
                out.push_str(&format!("intensity={} ", intensity.as_str()));
            }

            for target in [&self.power, &self.hr, &self.pace, &self.cadence]
                .into_iter()
                .flatten()
            {
                out.push_str(&target.to_text());
                out.push(' ');
            }
        }

        if let Some(text) = &self.text {
            out.push_str(text);
            out.push(' ');
        }

        match (self.reps, &self.steps) {
            (Some(_), Some(children)) => {
                for child in children {
                    out.push('\n');
                    out.push_str(&child.render(true)?);
                }
                out.push('\n');
            }
            _ if !nested && (warmup || cooldown) => out.push('\n'),
            _ => {}
        }
        Ok(out)
    }
}

fn nested_repeat_error(step: &Step) -> WorkoutError {
    WorkoutError::UnsupportedStructure(format!(
        "repeat block ({}x) nested inside a repeat block",
        step.reps.unwrap_or_default()
    ))
}

/// `1h`, `10m`, `30s`, `1h1m1s`. Below an hour, minutes only appear past
/// 100 s (or at exactly 60 s) so short intervals stay in seconds (`90s`).
pub fn format_duration(secs: i64) -> String {
    let mut remaining = secs;
    let mut out = String::new();
    let mut has_hours = false;
    if remaining > 3600 {
        out.push_str(&format!("{}h", remaining / 3600));
        remaining %= 3600;
        has_hours = true;
    }
    if remaining > 100 || remaining == 60 || (has_hours && remaining >= 60) {
        out.push_str(&format!("{}m", remaining / 60));
        remaining %= 60;
    }
    if remaining > 0 {
        out.push_str(&format!("{remaining}s"));
    }
    out
}

/// `400mtr` below a kilometre, `2.5km` from there on.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}mtr", format_number(meters))
    } else {
        format!("{}km", format_number(meters / 1000.0))
    }
}
