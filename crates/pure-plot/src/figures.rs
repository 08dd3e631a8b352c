//! Figure geometry, shared drawing helpers and the single-variable histogram.

use serde::{Deserialize, Serialize};

/// Pixel geometry shared by every figure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Width of one panel in pixels.
    pub width: u32,
    /// Height of one panel in pixels.
    pub height: u32,
    /// Histogram bin count.
    pub bins: usize,
    /// Space reserved for axis labels.
    pub margin: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
            bins: 20,
            margin: 48,
        }
    }
}

/// Labelled series of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    /// Legend text.
    pub label: String,
    /// Abscissae, paired index-wise with `y`.
    pub x: Vec<f64>,
    /// Ordinates.
    pub y: Vec<f64>,
}

impl Curve {
    /// Builds a curve; points with a non-finite coordinate are skipped when drawn.
    pub fn new(label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }

    pub(crate) fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(x, y)| (*x, *y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

pub(crate) const PALETTE: [&str; 6] = [
    "#000080", "#0000ff", "#4682b4", "#2e8b57", "#b8860b", "#708090",
];

/// Linear map from a data range onto a pixel range.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Axis {
    min: f64,
    span: f64,
    start: f64,
    length: f64,
}

impl Axis {
    pub(crate) fn new(min: f64, max: f64, start: f64, end: f64) -> Self {
        Self {
            min,
            span: (max - min).max(1e-9),
            start,
            length: end - start,
        }
    }

    pub(crate) fn fit<I: IntoIterator<Item = f64>>(values: I, start: f64, end: f64) -> Self {
        let (min, max) = bounds(values);
        Self::new(min, max, start, end)
    }

    pub(crate) fn map(&self, value: f64) -> f64 {
        self.start + (value - self.min) / self.span * self.length
    }

    pub(crate) fn min(&self) -> f64 {
        self.min
    }

    pub(crate) fn max(&self) -> f64 {
        self.min + self.span
    }
}

pub(crate) fn bounds<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
            (lo.min(value), hi.max(value))
        });
    if min.is_finite() {
        (min, max)
    } else {
        (0.0, 1.0)
    }
}

pub(crate) fn svg_open(width: u32, height: u32) -> String {
    format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width}' height='{height}' viewBox='0 0 {width} {height}'>"
    )
}

pub(crate) fn empty_svg(width: u32, height: u32) -> String {
    format!("{}</svg>", svg_open(width, height))
}

pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
}

pub(crate) fn text(x: f64, y: f64, anchor: &str, label: &str) -> String {
    format!(
        "<text x='{x:.2}' y='{y:.2}' font-size='11' font-family='sans-serif' text-anchor='{anchor}'>{}</text>",
        escape(label)
    )
}

pub(crate) fn histogram_bins(values: &[f64], bins: usize) -> (Vec<usize>, f64, f64) {
    let (min, max) = bounds(values.iter().copied());
    let bin_count = bins.max(1);
    let mut counts = vec![0usize; bin_count];
    let span = (max - min).max(1e-9);
    for value in values.iter().filter(|value| value.is_finite()) {
        let mut idx = ((value - min) / span * bin_count as f64).floor() as usize;
        if idx >= bin_count {
            idx = bin_count - 1;
        }
        counts[idx] += 1;
    }
    (counts, min, max)
}

/// Histogram bars inside the box `(x, y, width, height)`.
pub(crate) fn histogram_bars(
    values: &[f64],
    bins: usize,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<String> {
    let (counts, _, _) = histogram_bins(values, bins);
    let max_bin = counts.iter().copied().max().unwrap_or(0) as f64;
    let bar_width = width / counts.len() as f64;
    counts
        .iter()
        .enumerate()
        .map(|(idx, count)| {
            let bar = if max_bin == 0.0 {
                0.0
            } else {
                (*count as f64 / max_bin) * height
            };
            format!(
                "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='#3b82f6' />",
                x + bar_width * idx as f64,
                y + height - bar,
                bar_width.max(1.0),
                bar
            )
        })
        .collect()
}

/// Histogram of one variable filling the whole `width` by `height` canvas
/// with `config.bins` bars. Non-finite values are ignored.
pub fn render_histogram_svg(values: &[f64], config: &FigureConfig) -> String {
    if values.is_empty() {
        return empty_svg(config.width, config.height);
    }
    let mut parts = vec![svg_open(config.width, config.height)];
    parts.extend(histogram_bars(
        values,
        config.bins,
        0.0,
        0.0,
        config.width as f64,
        config.height as f64,
    ));
    parts.push("</svg>".into());
    parts.join("")
}
