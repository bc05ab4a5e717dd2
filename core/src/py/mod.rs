// core/src/py/mod.rs
// Python entry points (feature "python"). Everything crosses the boundary as
// JSON text; errors surface as ValueError.
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::error::WorkoutError;
use crate::step::Step;
use crate::workout_doc::WorkoutDoc;

fn to_py_err(e: WorkoutError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ──────────────────────────────────────────────────────────────────────────────
// WORKOUT DOCUMENTS
// ──────────────────────────────────────────────────────────────────────────────

/// Workout JSON -> workout-builder text.
#[pyfunction]
fn render_workout_json(json_str: &str) -> PyResult<String> {
    let doc = WorkoutDoc::from_json_str(json_str).map_err(to_py_err)?;
    doc.to_text().map_err(to_py_err)
}

/// Decode + encode: drops nulls and empty-string numbers, fills in the
/// derived name and the WORKOUT category.
#[pyfunction]
fn normalize_workout_json(json_str: &str) -> PyResult<String> {
    let doc = WorkoutDoc::from_json_str(json_str).map_err(to_py_err)?;
    doc.to_json_string().map_err(to_py_err)
}

// ──────────────────────────────────────────────────────────────────────────────
// STEPS
// ──────────────────────────────────────────────────────────────────────────────

#[pyfunction]
fn render_step_json(json_str: &str) -> PyResult<String> {
    let step = Step::from_json_str(json_str).map_err(to_py_err)?;
    step.to_text().map_err(to_py_err)
}

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-MODULE
// ──────────────────────────────────────────────────────────────────────────────

#[pymodule]
fn workout_doc_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(render_workout_json, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_workout_json, m)?)?;
    m.add_function(wrap_pyfunction!(render_step_json, m)?)?;
    Ok(())
}
