// core/src/wire.rs
// Presence-sensitive field reader shared by every decode().
//
// Absent keys and `null` both mean "not set". Numeric fields tolerate the
// loosely-typed upstream API: empty strings are absent and, unless disabled
// in DecodeConfig, numeric strings are parsed.
use std::collections::BTreeMap;
use std::str::FromStr;

use serde_json::{Map as JsonMap, Value as Json};
use serde_path_to_error as spte;

use crate::config::DecodeConfig;
use crate::error::{Result, WorkoutError};

/// Generic JSON object: the wire representation of every model type.
pub type JsonObject = JsonMap<String, Json>;

pub(crate) struct Fields<'a> {
    obj: &'a JsonObject,
    path: String,
    cfg: DecodeConfig,
}

impl<'a> Fields<'a> {
    /// Reader over `value`, which must be a JSON object.
    pub(crate) fn of(value: &'a Json, path: String, cfg: DecodeConfig) -> Result<Self> {
        match value {
            Json::Object(obj) => Ok(Self { obj, path, cfg }),
            other => Err(WorkoutError::malformed(
                display_path(&path),
                format!("expected an object, found {}", kind_of(other)),
            )),
        }
    }

    pub(crate) fn new(obj: &'a JsonObject, cfg: DecodeConfig) -> Self {
        Self {
            obj,
            path: String::new(),
            cfg,
        }
    }

    pub(crate) fn config(&self) -> DecodeConfig {
        self.cfg
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn raw(&self) -> &'a JsonObject {
        self.obj
    }

    fn key_path(&self, key: &str) -> String {
        join_path(&self.path, key)
    }

    fn get(&self, key: &str) -> Option<&'a Json> {
        match self.obj.get(key) {
            None | Some(Json::Null) => None,
            Some(v) => Some(v),
        }
    }

    pub(crate) fn string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Json::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.shape(key, "a string", other)),
        }
    }

    pub(crate) fn bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Json::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.shape(key, "a boolean", other)),
        }
    }

    pub(crate) fn f64(&self, key: &str) -> Result<Option<f64>> {
        let n = match self.get(key) {
            None => return Ok(None),
            Some(Json::Number(n)) => n.as_f64(),
            Some(Json::String(s)) if s.is_empty() => return Ok(None),
            Some(Json::String(s)) if self.cfg.numeric_strings => s.trim().parse::<f64>().ok(),
            Some(other) => return Err(self.shape(key, "a number", other)),
        };
        match n {
            Some(x) if x.is_finite() => Ok(Some(x)),
            _ => Err(WorkoutError::malformed(
                self.key_path(key),
                "expected a finite number",
            )),
        }
    }

    pub(crate) fn i64(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Json::Number(n)) => match n.as_i64() {
                Some(i) => Ok(Some(i)),
                None => integral(n.as_f64())
                    .map(Some)
                    .ok_or_else(|| self.not_integer(key)),
            },
            Some(Json::String(s)) if s.is_empty() => Ok(None),
            Some(Json::String(s)) if self.cfg.numeric_strings => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| integral(s.parse::<f64>().ok()))
                    .map(Some)
                    .ok_or_else(|| self.not_integer(key))
            }
            Some(other) => Err(self.shape(key, "an integer", other)),
        }
    }

    /// Vocabulary member from its wire token.
    pub(crate) fn token<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr<Err = WorkoutError>,
    {
        match self.get(key) {
            None => Ok(None),
            Some(Json::String(s)) => s.parse::<T>().map(Some).map_err(|e| {
                log::debug!("rejected token at {}: {}", self.key_path(key), e);
                e
            }),
            Some(other) => Err(self.shape(key, "a string token", other)),
        }
    }

    pub(crate) fn string_map(&self, key: &str) -> Result<Option<BTreeMap<String, String>>> {
        self.typed(key)
    }

    pub(crate) fn string_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        self.typed(key)
    }

    /// Nested object decoded by `decode`.
    pub(crate) fn object<T>(
        &self,
        key: &str,
        decode: impl FnOnce(&Fields<'a>) -> Result<T>,
    ) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => {
                let nested = Fields::of(v, self.key_path(key), self.cfg)?;
                decode(&nested).map(Some)
            }
        }
    }

    /// Array whose elements are decoded one by one; the first failure aborts.
    pub(crate) fn list<T>(
        &self,
        key: &str,
        mut decode: impl FnMut(&'a Json, String) -> Result<T>,
    ) -> Result<Option<Vec<T>>> {
        match self.get(key) {
            None => Ok(None),
            Some(Json::Array(items)) => {
                let base = self.key_path(key);
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| decode(item, format!("{base}[{i}]")))
                    .collect::<Result<Vec<_>>>()
                    .map(Some)
            }
            Some(other) => Err(self.shape(key, "an array", other)),
        }
    }

    fn typed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.get(key) {
            None => Ok(None),
            Some(v) => spte::deserialize(v).map(Some).map_err(|e| {
                let inner = e.path().to_string();
                let path = if inner == "." {
                    self.key_path(key)
                } else {
                    format!("{}.{}", self.key_path(key), inner)
                };
                WorkoutError::malformed(path, e.into_inner().to_string())
            }),
        }
    }

    fn shape(&self, key: &str, expected: &str, found: &Json) -> WorkoutError {
        WorkoutError::malformed(
            self.key_path(key),
            format!("expected {expected}, found {}", kind_of(found)),
        )
    }

    fn not_integer(&self, key: &str) -> WorkoutError {
        WorkoutError::malformed(self.key_path(key), "expected an integer")
    }
}

/// Whole-number float as i64 (30.0 -> 30); fractional or out of range -> None.
pub(crate) fn integral(x: Option<f64>) -> Option<i64> {
    match x {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => Some(f as i64),
        _ => None,
    }
}

pub(crate) fn join_path(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{base}.{key}")
    }
}

/// Encode-side counterpart of the finite check in [`Fields::f64`].
pub(crate) fn ensure_finite(path: &str, key: &str, x: Option<f64>) -> Result<()> {
    match x {
        Some(v) if !v.is_finite() => Err(WorkoutError::malformed(
            join_path(path, key),
            format!("cannot encode non-finite number {v}"),
        )),
        _ => Ok(()),
    }
}

pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

fn kind_of(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Serializes a model type into its wire object; absent fields are skipped by
/// the `skip_serializing_if` attributes on each type.
pub(crate) fn encode_object<T: serde::Serialize>(value: &T) -> Result<JsonObject> {
    match serde_json::to_value(value)? {
        Json::Object(obj) => Ok(obj),
        other => Err(WorkoutError::malformed(
            "<root>",
            format!("encoded to {} instead of an object", kind_of(&other)),
        )),
    }
}

/// Parses JSON text whose root must be an object.
pub(crate) fn parse_object(json_str: &str) -> Result<Json> {
    let value: Json = serde_json::from_str(json_str)
        .map_err(|e| WorkoutError::malformed("<root>", e.to_string()))?;
    if !value.is_object() {
        return Err(WorkoutError::malformed(
            "<root>",
            format!("expected an object, found {}", kind_of(&value)),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with<R>(v: Json, f: impl FnOnce(&Fields<'_>) -> R) -> R {
        let fields = Fields::of(&v, String::new(), DecodeConfig::default()).unwrap();
        f(&fields)
    }

    #[test]
    fn null_and_missing_are_absent() {
        with(json!({"a": null}), |f| {
            assert_eq!(f.f64("a").unwrap(), None);
            assert_eq!(f.f64("b").unwrap(), None);
            assert_eq!(f.string("a").unwrap(), None);
        });
    }

    #[test]
    fn empty_string_number_is_absent() {
        with(json!({"a": "", "b": ""}), |f| {
            assert_eq!(f.f64("a").unwrap(), None);
            assert_eq!(f.i64("b").unwrap(), None);
        });
    }

    #[test]
    fn integers_accept_whole_floats_only() {
        with(json!({"a": 30.0, "b": 30.5, "c": "45"}), |f| {
            assert_eq!(f.i64("a").unwrap(), Some(30));
            assert!(matches!(
                f.i64("b"),
                Err(WorkoutError::MalformedInput { .. })
            ));
            assert_eq!(f.i64("c").unwrap(), Some(45));
        });
    }

    #[test]
    fn numeric_strings_can_be_disabled() {
        let v = json!({"a": "60"});
        let cfg = DecodeConfig {
            numeric_strings: false,
            ..DecodeConfig::default()
        };
        let f = Fields::of(&v, String::new(), cfg).unwrap();
        assert!(matches!(f.f64("a"), Err(WorkoutError::MalformedInput { .. })));
    }

    #[test]
    fn string_map_error_carries_nested_path() {
        with(json!({"opts": {"pool_length": 25}}), |f| {
            match f.string_map("opts") {
                Err(WorkoutError::MalformedInput { path, .. }) => {
                    assert!(path.starts_with("opts"), "path was {path}")
                }
                other => panic!("unexpected: {other:?}"),
            }
        });
    }

    #[test]
    fn non_finite_numbers_are_not_encodable() {
        assert!(ensure_finite("", "value", Some(1.5)).is_ok());
        assert!(ensure_finite("", "value", None).is_ok());
        match ensure_finite("steps[0].power", "end", Some(f64::INFINITY)) {
            Err(WorkoutError::MalformedInput { path, .. }) => {
                assert_eq!(path, "steps[0].power.end")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn list_paths_are_indexed() {
        with(json!({"xs": [1, "x"]}), |f| {
            let err = f
                .list("xs", |item, path| {
                    item.as_i64()
                        .ok_or_else(|| WorkoutError::malformed(path, "not an int"))
                })
                .unwrap_err();
            match err {
                WorkoutError::MalformedInput { path, .. } => assert_eq!(path, "xs[1]"),
                other => panic!("unexpected: {other:?}"),
            }
        });
    }
}
