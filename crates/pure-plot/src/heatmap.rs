use crate::figures::{empty_svg, svg_open, text, FigureConfig};

fn diverging(value: f64, limit: f64) -> String {
    if !value.is_finite() {
        return "#9ca3af".to_string();
    }
    let t = (value / limit).clamp(-1.0, 1.0);
    let fade = |weight: f64| (255.0 * (1.0 - weight)).round() as u8;
    let (r, g, b) = if t >= 0.0 {
        (255, fade(t), fade(t))
    } else {
        (fade(-t), fade(-t), 255)
    };
    format!("rgb({r},{g},{b})")
}

/// Sensitivity heatmap with one row per parameter and one column per time.
///
/// Colours run from blue (negative) through white to red (positive), scaled
/// by the largest absolute finite entry. Non-finite entries are grey.
pub fn render_heatmap_svg(
    row_labels: &[String],
    columns_hours: &[f64],
    values: &[Vec<f64>],
    config: &FigureConfig,
) -> String {
    if row_labels.is_empty() || columns_hours.is_empty() {
        return empty_svg(config.width, config.height);
    }
    let margin = config.margin as f64 * 2.0;
    let plot_width = config.width as f64 - margin;
    let plot_height = config.height as f64 - config.margin as f64;
    let cell_width = plot_width / columns_hours.len() as f64;
    let cell_height = plot_height / row_labels.len() as f64;
    let limit = values
        .iter()
        .flatten()
        .filter(|value| value.is_finite())
        .fold(0.0f64, |acc, value| acc.max(value.abs()))
        .max(1e-12);

    let mut parts = vec![svg_open(config.width, config.height)];
    for (row, label) in row_labels.iter().enumerate() {
        let y = cell_height * row as f64;
        for col in 0..columns_hours.len() {
            let value = values
                .get(row)
                .and_then(|cells| cells.get(col))
                .copied()
                .unwrap_or(f64::NAN);
            parts.push(format!(
                "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='{}' />",
                margin + cell_width * col as f64,
                y,
                cell_width,
                cell_height,
                diverging(value, limit)
            ));
        }
        parts.push(text(margin - 4.0, y + cell_height / 2.0 + 4.0, "end", label));
    }
    let axis_y = plot_height + 14.0;
    let last = columns_hours.len() - 1;
    parts.push(text(margin, axis_y, "start", &format!("{:.2}", columns_hours[0])));
    parts.push(text(
        margin + plot_width,
        axis_y,
        "end",
        &format!("{:.2}", columns_hours[last]),
    ));
    parts.push(text(margin + plot_width / 2.0, axis_y + 14.0, "middle", "Time (h)"));
    parts.push(text(
        margin + plot_width,
        config.height as f64 - 2.0,
        "end",
        &format!("|S| max {limit:.3}"),
    ));
    parts.push("</svg>".into());
    parts.join("")
}
