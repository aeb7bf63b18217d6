//! SVG chart rendering.
//!
//! Builds a self-contained candlestick chart: price panel with the three
//! band overlays, volume bar sub-panel, sparse axis labels. Dark theme,
//! green/red candles, dashed outer bands. Overlay lines are only drawn over
//! contiguous runs of defined values, so warmup rows render as gaps.

use crate::domain::bollinger::{BandPoint, BandSeries};
use crate::domain::error::BandviewError;

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 540.0;
const PAD_LEFT: f64 = 64.0;
const PAD_RIGHT: f64 = 16.0;
const PAD_TOP: f64 = 16.0;
const PRICE_HEIGHT: f64 = 340.0;
const PANEL_GAP: f64 = 24.0;
const VOLUME_HEIGHT: f64 = 110.0;

const UP_COLOR: &str = "#26a69a";
const DOWN_COLOR: &str = "#ef5350";
const WICK_COLOR: &str = "#e0e0e0";
const MA_COLOR: &str = "#ffffff";
const BAND_COLOR: &str = "#ef5350";
const GRID_COLOR: &str = "#333333";
const LABEL_COLOR: &str = "#bbbbbb";

struct PriceScale {
    min: f64,
    max: f64,
}

impl PriceScale {
    fn from_points(points: &[BandPoint]) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for p in points {
            min = min.min(p.bar.low);
            max = max.max(p.bar.high);
            if let Some(lower) = p.lower {
                min = min.min(lower);
            }
            if let Some(upper) = p.upper {
                max = max.max(upper);
            }
        }
        // Flat series still needs a visible span.
        if max - min < f64::EPSILON {
            min -= 1.0;
            max += 1.0;
        }
        let pad = (max - min) * 0.03;
        Self {
            min: min - pad,
            max: max + pad,
        }
    }

    fn y(&self, value: f64) -> f64 {
        let frac = (value - self.min) / (self.max - self.min);
        PAD_TOP + PRICE_HEIGHT * (1.0 - frac)
    }
}

/// Render the augmented series as an SVG document.
pub fn render_chart(series: &BandSeries) -> Result<String, BandviewError> {
    if series.is_empty() {
        return Err(BandviewError::Render {
            reason: "series has no rows".to_string(),
        });
    }

    let points = &series.points;
    let n = points.len();
    let plot_width = WIDTH - PAD_LEFT - PAD_RIGHT;
    let step = plot_width / n as f64;
    let body_width = (step * 0.6).max(1.0);
    let x_center = |i: usize| PAD_LEFT + (i as f64 + 0.5) * step;

    let price = PriceScale::from_points(points);
    let volume_top = PAD_TOP + PRICE_HEIGHT + PANEL_GAP;
    let volume_base = volume_top + VOLUME_HEIGHT;
    let max_volume = points
        .iter()
        .map(|p| p.bar.volume)
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let mut svg = String::with_capacity(n * 256);
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" \
         role=\"img\" font-family=\"monospace\" font-size=\"12\">\n"
    ));
    svg.push_str(&format!(
        "<rect width=\"{WIDTH}\" height=\"{HEIGHT}\" fill=\"#000000\"/>\n"
    ));

    // Horizontal gridlines with price labels.
    for tick in 0..=4 {
        let value = price.min + (price.max - price.min) * tick as f64 / 4.0;
        let y = price.y(value);
        svg.push_str(&format!(
            "<line class=\"grid\" x1=\"{PAD_LEFT:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" \
             stroke=\"{GRID_COLOR}\" stroke-width=\"1\"/>\n",
            WIDTH - PAD_RIGHT
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" fill=\"{LABEL_COLOR}\" text-anchor=\"end\">{value:.2}</text>\n",
            PAD_LEFT - 6.0,
            y + 4.0
        ));
    }

    // Candles and volume bars.
    for (i, point) in points.iter().enumerate() {
        let bar = &point.bar;
        let x = x_center(i);
        let color = if bar.close >= bar.open {
            UP_COLOR
        } else {
            DOWN_COLOR
        };

        svg.push_str(&format!(
            "<line class=\"wick\" x1=\"{x:.1}\" y1=\"{:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" \
             stroke=\"{WICK_COLOR}\" stroke-width=\"1\"/>\n",
            price.y(bar.high),
            price.y(bar.low)
        ));

        let body_top = price.y(bar.open.max(bar.close));
        let body_bottom = price.y(bar.open.min(bar.close));
        let body_height = (body_bottom - body_top).max(1.0);
        svg.push_str(&format!(
            "<rect class=\"candle\" x=\"{:.1}\" y=\"{body_top:.1}\" width=\"{body_width:.1}\" \
             height=\"{body_height:.1}\" fill=\"{color}\"/>\n",
            x - body_width / 2.0
        ));

        let bar_height = VOLUME_HEIGHT * bar.volume as f64 / max_volume;
        svg.push_str(&format!(
            "<rect class=\"volume\" x=\"{:.1}\" y=\"{:.1}\" width=\"{body_width:.1}\" \
             height=\"{bar_height:.1}\" fill=\"{color}\" fill-opacity=\"0.7\"/>\n",
            x - body_width / 2.0,
            volume_base - bar_height
        ));
    }

    // Overlay lines, broken at undefined rows.
    push_overlay(
        &mut svg,
        "ma",
        points.iter().map(|p| p.ma),
        &price,
        x_center,
        &format!("stroke=\"{MA_COLOR}\" stroke-width=\"1\""),
    );
    for (class, values) in [
        ("band-upper", points.iter().map(|p| p.upper).collect::<Vec<_>>()),
        ("band-lower", points.iter().map(|p| p.lower).collect::<Vec<_>>()),
    ] {
        push_overlay(
            &mut svg,
            class,
            values.into_iter(),
            &price,
            x_center,
            &format!("stroke=\"{BAND_COLOR}\" stroke-width=\"1\" stroke-dasharray=\"5 4\""),
        );
    }

    // Date labels: first, middle, last.
    let label_y = volume_base + 18.0;
    let labels = [
        (0, "start"),
        (n / 2, "middle"),
        (n - 1, "end"),
    ];
    for (i, anchor) in labels {
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{label_y:.1}\" fill=\"{LABEL_COLOR}\" text-anchor=\"{anchor}\">{}</text>\n",
            x_center(i),
            points[i].bar.date.format("%Y-%m-%d")
        ));
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Append one `<polyline>` per contiguous run of defined values.
fn push_overlay(
    svg: &mut String,
    class: &str,
    values: impl Iterator<Item = Option<f64>>,
    price: &PriceScale,
    x_center: impl Fn(usize) -> f64,
    stroke_attrs: &str,
) {
    let mut run: Vec<String> = Vec::new();
    let mut flush = |run: &mut Vec<String>, svg: &mut String| {
        // A single point draws nothing; skip it rather than emit a degenerate line.
        if run.len() > 1 {
            svg.push_str(&format!(
                "<polyline class=\"{class}\" fill=\"none\" {stroke_attrs} points=\"{}\"/>\n",
                run.join(" ")
            ));
        }
        run.clear();
    };

    for (i, value) in values.enumerate() {
        match value {
            Some(v) => run.push(format!("{:.1},{:.1}", x_center(i), price.y(v))),
            None => flush(&mut run, svg),
        }
    }
    flush(&mut run, svg);
}
