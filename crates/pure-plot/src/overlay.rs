use pure_core::SECONDS_PER_HOUR;

use crate::figures::{empty_svg, svg_open, text, Axis, Curve, FigureConfig, PALETTE};

const SIMULATED_COLOR: &str = "#c000c0";

/// Simulated trajectory as a line with replicate observations scattered on
/// top. `x` values of every curve are seconds and are drawn in hours.
pub fn render_overlay_svg(
    title: &str,
    y_label: &str,
    simulated: &Curve,
    replicates: &[Curve],
    config: &FigureConfig,
) -> String {
    let curves = std::iter::once(simulated).chain(replicates);
    if curves.clone().all(|curve| curve.points().next().is_none()) {
        return empty_svg(config.width, config.height);
    }
    let margin = config.margin as f64;
    let width = config.width as f64;
    let height = config.height as f64;
    let x_axis = Axis::fit(
        curves
            .clone()
            .flat_map(|curve| curve.points().map(|(x, _)| x / SECONDS_PER_HOUR)),
        margin,
        width - margin / 2.0,
    );
    let y_axis = Axis::fit(
        curves.flat_map(|curve| curve.points().map(|(_, y)| y)),
        height - margin,
        margin / 2.0,
    );

    let mut parts = vec![svg_open(config.width, config.height)];
    parts.push(text(width / 2.0, margin / 3.0, "middle", title));
    parts.push(format!(
        "<line x1='{m:.2}' y1='{b:.2}' x2='{r:.2}' y2='{b:.2}' stroke='black' />\
         <line x1='{m:.2}' y1='{t:.2}' x2='{m:.2}' y2='{b:.2}' stroke='black' />",
        m = margin,
        b = height - margin,
        r = width - margin / 2.0,
        t = margin / 2.0
    ));
    parts.push(text(width / 2.0, height - margin / 4.0, "middle", "Time (h)"));
    parts.push(text(margin / 4.0, height / 2.0, "start", y_label));
    parts.push(text(margin, height - margin + 14.0, "middle", &format!("{:.2}", x_axis.min())));
    parts.push(text(
        width - margin / 2.0,
        height - margin + 14.0,
        "middle",
        &format!("{:.2}", x_axis.max()),
    ));
    parts.push(text(margin - 4.0, height - margin, "end", &format!("{:.3}", y_axis.min())));
    parts.push(text(margin - 4.0, margin / 2.0 + 4.0, "end", &format!("{:.3}", y_axis.max())));

    for (idx, replicate) in replicates.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        for (x, y) in replicate.points() {
            parts.push(format!(
                "<circle cx='{:.2}' cy='{:.2}' r='2' fill='{color}' fill-opacity='0.5' />",
                x_axis.map(x / SECONDS_PER_HOUR),
                y_axis.map(y)
            ));
        }
    }
    let points: Vec<String> = simulated
        .points()
        .map(|(x, y)| format!("{:.2},{:.2}", x_axis.map(x / SECONDS_PER_HOUR), y_axis.map(y)))
        .collect();
    parts.push(format!(
        "<polyline points='{}' fill='none' stroke='{SIMULATED_COLOR}' stroke-width='1.5' />",
        points.join(" ")
    ));

    let legend = std::iter::once((simulated.label.as_str(), SIMULATED_COLOR)).chain(
        replicates
            .iter()
            .enumerate()
            .map(|(idx, curve)| (curve.label.as_str(), PALETTE[idx % PALETTE.len()])),
    );
    for (row, (label, color)) in legend.enumerate() {
        let y = margin / 2.0 + 12.0 + 14.0 * row as f64;
        parts.push(format!(
            "<rect x='{:.2}' y='{:.2}' width='8' height='8' fill='{color}' />",
            margin + 8.0,
            y - 8.0
        ));
        parts.push(text(margin + 20.0, y, "start", label));
    }
    parts.push("</svg>".into());
    parts.join("")
}
