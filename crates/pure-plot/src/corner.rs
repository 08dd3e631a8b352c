use crate::figures::{bounds, empty_svg, histogram_bars, svg_open, text, Axis, FigureConfig};

/// Corner plot of posterior samples: marginal histograms on the diagonal,
/// pairwise scatter below it.
///
/// `samples` holds one row per draw with one column per entry of `names`.
/// Each panel is `config.height` pixels square.
pub fn render_corner_svg(names: &[String], samples: &[Vec<f64>], config: &FigureConfig) -> String {
    let dims = names.len();
    let panel = config.height as f64;
    let margin = config.margin as f64;
    let size = (margin + panel * dims as f64).ceil() as u32 + config.margin / 2;
    if dims == 0 || samples.is_empty() {
        return empty_svg(size, size);
    }
    let columns: Vec<Vec<f64>> = (0..dims)
        .map(|col| {
            samples
                .iter()
                .filter_map(|row| row.get(col).copied())
                .collect()
        })
        .collect();
    let ranges: Vec<(f64, f64)> = columns
        .iter()
        .map(|column| bounds(column.iter().copied()))
        .collect();
    let inset = 4.0;

    let mut parts = vec![svg_open(size, size)];
    for row in 0..dims {
        for col in 0..=row {
            let x0 = margin + panel * col as f64;
            let y0 = panel * row as f64;
            parts.push(format!(
                "<rect x='{x0:.2}' y='{y0:.2}' width='{panel:.2}' height='{panel:.2}' fill='none' stroke='#cccccc' />"
            ));
            if row == col {
                parts.extend(histogram_bars(
                    &columns[col],
                    config.bins,
                    x0 + inset,
                    y0 + inset,
                    panel - 2.0 * inset,
                    panel - 2.0 * inset,
                ));
                continue;
            }
            let x_axis = Axis::new(ranges[col].0, ranges[col].1, x0 + inset, x0 + panel - inset);
            let y_axis = Axis::new(ranges[row].0, ranges[row].1, y0 + panel - inset, y0 + inset);
            for (x, y) in columns[col].iter().zip(&columns[row]) {
                if !(x.is_finite() && y.is_finite()) {
                    continue;
                }
                parts.push(format!(
                    "<circle cx='{:.2}' cy='{:.2}' r='1.2' fill='#1f2937' fill-opacity='0.3' />",
                    x_axis.map(*x),
                    y_axis.map(*y)
                ));
            }
        }
    }
    let bottom = panel * dims as f64;
    for (idx, name) in names.iter().enumerate() {
        let centre = margin + panel * idx as f64 + panel / 2.0;
        parts.push(text(centre, bottom + 16.0, "middle", name));
        let (lo, hi) = ranges[idx];
        parts.push(text(
            centre,
            bottom + 30.0,
            "middle",
            &format!("[{lo:.3}, {hi:.3}]"),
        ));
        if idx > 0 {
            parts.push(text(
                margin - 4.0,
                panel * idx as f64 + panel / 2.0,
                "end",
                name,
            ));
        }
    }
    parts.push("</svg>".into());
    parts.join("")
}
