//! Workout documents for an intervals.icu-style training API: the step-tree
//! model, its JSON wire codec and the workout-builder text rendering.

pub mod cli;
pub mod config;
pub mod error;
pub mod sport_settings;
pub mod step;
pub mod value;
pub mod vocab;
pub mod wire;
pub mod workout_doc;

#[cfg(feature = "python")]
pub mod py;

pub use config::DecodeConfig;
pub use error::{Result, WorkoutError};
pub use sport_settings::SportSettings;
pub use step::{format_distance, format_duration, Step, StepKind};
pub use value::{format_number, Value};
pub use vocab::{
    EventCategory, HrTarget, Intensity, PaceUnits, ValueUnits, WorkoutOption, WorkoutTarget,
    WorkoutType,
};
pub use wire::JsonObject;
pub use workout_doc::{WorkoutDoc, ZoneTime};
