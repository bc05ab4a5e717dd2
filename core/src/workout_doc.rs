// core/src/workout_doc.rs
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value as Json;

use crate::config::DecodeConfig;
use crate::error::{Result, WorkoutError};
use crate::sport_settings::SportSettings;
use crate::step::Step;
use crate::vocab::{EventCategory, PaceUnits, WorkoutOption, WorkoutTarget, WorkoutType};
use crate::wire::{self, integral, Fields, JsonObject};

const START_DATE_FORMAT: &str = "%Y-%m-%d";

/// One entry of `zoneTimes`. The API sends either plain seconds or an
/// object per zone; both are kept exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ZoneTime {
    Seconds(i64),
    Detail(JsonObject),
}

/// A complete workout document: metadata, athlete thresholds and the step tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkoutDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_locale: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_type: Option<WorkoutType>,
    /// `YYYY-MM-DD`, kept as sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Total seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Total meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_time: Option<i64>,

    /// Watts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ftp: Option<i64>,
    /// bpm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lthr: Option<i64>,
    /// m/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_pace: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace_units: Option<PaceUnits>,

    #[serde(rename = "sportSettings", skip_serializing_if = "Option::is_none")]
    pub sport_settings: Option<SportSettings>,
    pub category: EventCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<WorkoutTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
    #[serde(rename = "zoneTimes", skip_serializing_if = "Option::is_none")]
    pub zone_times: Option<Vec<ZoneTime>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locales: Option<Vec<String>>,
}

impl WorkoutDoc {
    /// Finishes construction: fills in derived fields once.
    ///
    /// Later mutation does not re-run derivation; call [`WorkoutDoc::derive_name`]
    /// again if the description changes and the name should follow.
    pub fn build(mut self) -> Self {
        self.derive_name();
        self
    }

    /// Without a name, the first line of the description becomes the name.
    pub fn derive_name(&mut self) {
        if self.name.is_some() {
            return;
        }
        if let Some(desc) = &self.description {
            let first = desc.split('\n').next().unwrap_or_default().to_string();
            log::trace!("workout name derived from description: {first:?}");
            self.name = Some(first);
        }
    }

    pub fn start_date_parsed(&self) -> Result<Option<NaiveDate>> {
        match &self.start_date {
            None => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, START_DATE_FORMAT)
                .map(Some)
                .map_err(|e| WorkoutError::malformed("start_date", e.to_string())),
        }
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date.format(START_DATE_FORMAT).to_string());
        self
    }

    pub fn option(&self, key: WorkoutOption) -> Option<&str> {
        self.options
            .as_ref()
            .and_then(|m| m.get(key.as_str()))
            .map(String::as_str)
    }

    /// Leaf intervals in the whole document, repeat blocks expanded.
    /// Saturates at `i64::MAX`.
    pub fn total_step_count(&self) -> i64 {
        self.steps
            .iter()
            .flatten()
            .map(Step::leaf_count)
            .fold(0, i64::saturating_add)
    }

    pub fn encode(&self) -> Result<JsonObject> {
        self.check_finite()?;
        let obj = wire::encode_object(self)?;
        log::debug!(
            "encoded workout {:?}: {} key(s), {} top-level step(s)",
            self.name,
            obj.len(),
            self.steps.as_ref().map_or(0, Vec::len)
        );
        Ok(obj)
    }

    pub fn decode(obj: &JsonObject) -> Result<Self> {
        Self::decode_with(obj, DecodeConfig::default())
    }

    pub fn decode_with(obj: &JsonObject, cfg: DecodeConfig) -> Result<Self> {
        Self::from_fields(&Fields::new(obj, cfg))
    }

    fn from_fields(f: &Fields<'_>) -> Result<Self> {
        let cfg = f.config();

        if let Some(category) = f.raw().get("category").and_then(Json::as_str) {
            if category != EventCategory::Workout.as_str() {
                log::warn!("ignoring category {category:?}; workout documents are always WORKOUT");
            }
        }

        let doc = Self {
            name: f.string("name")?,
            description: f.string("description")?,
            description_locale: f.string_map("description_locale")?,
            workout_type: f.token("workout_type")?,
            start_date: f.string("start_date")?,
            duration: f.i64("duration")?,
            distance: f.f64("distance")?,
            moving_time: f.i64("moving_time")?,
            ftp: f.i64("ftp")?,
            lthr: f.i64("lthr")?,
            threshold_pace: f.f64("threshold_pace")?,
            pace_units: f.token("pace_units")?,
            sport_settings: f.object("sportSettings", SportSettings::from_fields)?,
            category: EventCategory::Workout,
            target: f.token("target")?,
            steps: f.list("steps", |item, path| {
                Step::from_fields(&Fields::of(item, path, cfg)?)
            })?,
            zone_times: f.list("zoneTimes", zone_time)?,
            options: f.string_map("options")?,
            locales: f.string_list("locales")?,
        }
        .build();

        log::debug!(
            "decoded workout {:?}: {} top-level step(s)",
            doc.name,
            doc.steps.as_ref().map_or(0, Vec::len)
        );
        Ok(doc)
    }

    pub fn to_json_string(&self) -> Result<String> {
        self.check_finite()?;
        Ok(serde_json::to_string(self)?)
    }

    fn check_finite(&self) -> Result<()> {
        wire::ensure_finite("", "distance", self.distance)?;
        wire::ensure_finite("", "threshold_pace", self.threshold_pace)?;
        for (i, step) in self.steps.iter().flatten().enumerate() {
            step.check_finite(&format!("steps[{i}]"))?;
        }
        Ok(())
    }

    pub fn from_json_str(json_str: &str) -> Result<Self> {
        Self::from_json_str_with(json_str, DecodeConfig::default())
    }

    pub fn from_json_str_with(json_str: &str, cfg: DecodeConfig) -> Result<Self> {
        let root = wire::parse_object(json_str)?;
        Self::from_fields(&Fields::of(&root, String::new(), cfg)?)
    }

    /// Description, then every step in workout-builder text, one per line.
    pub fn to_text(&self) -> Result<String> {
        let mut out = String::new();
        if let Some(desc) = &self.description {
            out.push_str(desc);
            out.push('\n');
        }
        for step in self.steps.iter().flatten() {
            out.push_str(&step.to_text()?);
            out.push('\n');
        }
        Ok(out)
    }
}

fn zone_time(item: &Json, path: String) -> Result<ZoneTime> {
    match item {
        Json::Number(n) => n
            .as_i64()
            .or_else(|| integral(n.as_f64()))
            .map(ZoneTime::Seconds)
            .ok_or_else(|| WorkoutError::malformed(path, "expected whole seconds")),
        Json::Object(obj) => Ok(ZoneTime::Detail(obj.clone())),
        _ => Err(WorkoutError::malformed(
            path,
            "expected an integer or an object",
        )),
    }
}
