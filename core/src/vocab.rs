// core/src/vocab.rs
// Closed token sets used on the wire. Every vocabulary goes through the same
// macro so the token table is the single source for encode, decode and Display.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WorkoutError;

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident as $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire token for this member.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = WorkoutError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    other => Err(WorkoutError::UnknownEnumToken {
                        vocabulary: $label,
                        token: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// Well-known keys of the workout `options` map.
    WorkoutOption as "option" {
        Category => "category",
        PoolLength => "pool_length",
        Power => "power",
    }
}

vocabulary! {
    /// Primary target a device should follow for the whole workout.
    WorkoutTarget as "workout target" {
        Auto => "AUTO",
        Power => "POWER",
        Hr => "HR",
        Pace => "PACE",
    }
}

vocabulary! {
    /// Averaging window applied to a heart-rate target.
    HrTarget as "hr target" {
        Lap => "lap",
        Instant => "1s",
        ThreeSecond => "3s",
        TenSecond => "10s",
        ThirtySecond => "30s",
    }
}

vocabulary! {
    Intensity as "intensity" {
        Active => "active",
        Rest => "rest",
        Warmup => "warmup",
        Cooldown => "cooldown",
        Recovery => "recovery",
        Interval => "interval",
        Other => "other",
    }
}

vocabulary! {
    PaceUnits as "pace units" {
        Secs100m => "SECS_100M",
        Secs100y => "SECS_100Y",
        MinsKm => "MINS_KM",
        MinsMile => "MINS_MILE",
        Secs500m => "SECS_500M",
    }
}

vocabulary! {
    /// Unit of a step target value.
    ValueUnits as "value units" {
        PercentMmp => "%mmp",
        PercentHr => "%hr",
        PercentLthr => "%lthr",
        PercentPace => "%pace",
        PowerZone => "power_zone",
        HrZone => "hr_zone",
        PaceZone => "pace_zone",
        Watts => "w",
        PercentFtp => "%ftp",
        Cadence => "cadence",
    }
}

vocabulary! {
    WorkoutType as "workout type" {
        Ride => "ride",
        Run => "run",
        Swim => "swim",
        Row => "row",
        Walk => "walk",
        Other => "other",
    }
}

vocabulary! {
    /// Calendar category of a workout document. Only workouts are modelled.
    EventCategory as "category" {
        Workout => "WORKOUT",
    }
}

impl Default for EventCategory {
    fn default() -> Self {
        EventCategory::Workout
    }
}

impl ValueUnits {
    /// Units expressed as a percentage of a threshold.
    pub fn is_percent(&self) -> bool {
        matches!(
            self,
            ValueUnits::PercentHr
                | ValueUnits::PercentMmp
                | ValueUnits::PercentLthr
                | ValueUnits::PercentPace
                | ValueUnits::PercentFtp
        )
    }

    pub fn is_zone(&self) -> bool {
        matches!(
            self,
            ValueUnits::PowerZone | ValueUnits::HrZone | ValueUnits::PaceZone
        )
    }

    /// Short label printed after a value in workout text.
    pub fn label(&self) -> &'static str {
        match self {
            ValueUnits::PercentHr | ValueUnits::HrZone => "HR",
            ValueUnits::PercentMmp => "MMP",
            ValueUnits::PercentLthr => "LTHR",
            ValueUnits::PercentPace | ValueUnits::PaceZone => "Pace",
            ValueUnits::PercentFtp => "ftp",
            ValueUnits::PowerZone => "W",
            ValueUnits::Cadence => "Cadence",
            ValueUnits::Watts => "",
        }
    }
}
