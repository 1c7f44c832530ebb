use keystats::models::{MetricField, Unit};

const BAR_WIDTH: usize = 10;

/// Text progress bar for a value already normalized into `[0, 1]`.
pub fn progress_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn format_value(field: MetricField, value: Option<f64>) -> String {
    match value {
        None => "—".to_string(),
        Some(v) => match field.unit() {
            Unit::Fraction => format!("{:.2}%", v * 100.0),
            Unit::Distance => format!("{:.1}u", v),
        },
    }
}
