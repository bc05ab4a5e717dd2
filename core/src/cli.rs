use anyhow::Context;

use crate::workout_doc::WorkoutDoc;

/// Decodes a workout from JSON text and renders it as workout-builder text.
pub fn render_workout_json(json_str: &str) -> anyhow::Result<String> {
    let doc = WorkoutDoc::from_json_str(json_str).context("decoding workout document")?;
    doc.to_text().context("rendering workout text")
}

/// Header lines shown above the workout text in a report.
pub fn workout_summary(doc: &WorkoutDoc) -> Vec<String> {
    let mut lines = vec![format!(
        "Workout: {}",
        doc.name.as_deref().unwrap_or("(unnamed)")
    )];
    if let Some(kind) = doc.workout_type {
        lines.push(format!("Type: {kind}"));
    }
    if let Some(date) = &doc.start_date {
        lines.push(format!("Date: {date}"));
    }
    lines.push(format!("Intervals: {}", doc.total_step_count()));
    lines
}

pub fn print_workout_report(doc: &WorkoutDoc) -> anyhow::Result<()> {
    let text = doc.to_text().context("rendering workout text")?;

    println!("--- Workout Report ---");
    for line in workout_summary(doc) {
        println!("{line}");
    }
    println!("{text}");
    Ok(())
}
