//! SVG chart rendering for derived throughput.
//!
//! Produces self-contained SVG documents: grouped bar charts (per thread
//! count for one matrix, or per matrix at one thread count) and scaling line
//! charts. Each strategy keeps a fixed color, hatch and marker so charts
//! from different runs read the same way.

use std::fmt::Write as _;

use crate::metrics::{MISSING_THROUGHPUT, MatrixSeries};
use crate::record::Strategy;

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 56.0;
const MARGIN_BOTTOM: f64 = 72.0;
const Y_TICKS: u32 = 5;
/// Category axes with more entries than this get slanted labels.
const ROTATE_AFTER: usize = 8;

/// Strategies in legend and bar order.
pub const STRATEGIES: [Strategy; 3] = [Strategy::Serial, Strategy::Static, Strategy::NnzBalanced];

/// Canvas settings shared by all charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOptions {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Text prepended to every chart title.
    pub title_prefix: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 900,
            height: 480,
            title_prefix: "SpMV".to_string(),
        }
    }
}

/// One strategy's values, aligned with the chart's categories.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Strategy the values belong to.
    pub strategy: Strategy,
    /// One value per category; [`MISSING_THROUGHPUT`] marks a gap.
    pub values: Vec<f64>,
}

/// Fill color of a strategy.
pub const fn color(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Serial => "#0072B2",
        Strategy::Static => "#E69F00",
        Strategy::NnzBalanced => "#009E73",
    }
}

const fn dash(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Serial => "none",
        Strategy::Static => "7,4",
        Strategy::NnzBalanced => "9,3,2,3",
    }
}

/// Grouped bars per thread count for one matrix.
pub fn matrix_bar_chart(series: &MatrixSeries, threads: &[u32], opts: &ChartOptions) -> String {
    let categories: Vec<String> = threads.iter().map(u32::to_string).collect();
    bar_chart(
        &format!("{} Performance – Matrix: {}", opts.title_prefix, series.matrix_name),
        "Number of Threads",
        "Performance (GFLOP/s)",
        &categories,
        &per_thread_series(series, threads),
        opts,
    )
}

/// Scaling curves per strategy for one matrix.
pub fn matrix_line_chart(series: &MatrixSeries, threads: &[u32], opts: &ChartOptions) -> String {
    let categories: Vec<String> = threads.iter().map(u32::to_string).collect();
    line_chart(
        &format!(
            "{} Performance Scaling – Matrix: {}",
            opts.title_prefix, series.matrix_name
        ),
        "Number of Threads",
        "Performance (GFLOP/s)",
        &categories,
        &per_thread_series(series, threads),
        opts,
    )
}

/// Grouped bars per matrix at one reference thread count.
pub fn comparison_chart(series: &[MatrixSeries], threads: u32, opts: &ChartOptions) -> String {
    let categories: Vec<String> = series.iter().map(|s| s.matrix_name.clone()).collect();
    let groups: Vec<ChartSeries> = STRATEGIES
        .iter()
        .map(|&strategy| ChartSeries {
            strategy,
            values: series.iter().map(|s| s.at(strategy, threads)).collect(),
        })
        .collect();

    // Matrix names are long; always slant them.
    grouped_bars(
        &format!("{} GFLOP/s Comparison Across Matrices", opts.title_prefix),
        "Matrix",
        &format!("GFLOP/s - {threads} Threads"),
        &categories,
        &groups,
        opts,
        true,
    )
}

fn per_thread_series(series: &MatrixSeries, threads: &[u32]) -> Vec<ChartSeries> {
    STRATEGIES
        .iter()
        .map(|&strategy| ChartSeries {
            strategy,
            values: threads.iter().map(|&t| series.at(strategy, t)).collect(),
        })
        .collect()
}

/// Render a grouped bar chart.
pub fn bar_chart(
    title: &str,
    x_label: &str,
    y_label: &str,
    categories: &[String],
    groups: &[ChartSeries],
    opts: &ChartOptions,
) -> String {
    let rotate = categories.len() > ROTATE_AFTER;
    grouped_bars(title, x_label, y_label, categories, groups, opts, rotate)
}

fn grouped_bars(
    title: &str,
    x_label: &str,
    y_label: &str,
    categories: &[String],
    groups: &[ChartSeries],
    opts: &ChartOptions,
    rotate_labels: bool,
) -> String {
    let frame = Frame::new(opts, categories.len(), groups, rotate_labels);
    let mut svg = frame.begin(title, x_label, y_label);

    let group_width = frame.slot * 0.75;
    let bar_width = group_width / groups.len().max(1) as f64;

    for (i, _) in categories.iter().enumerate() {
        let group_x = frame.x0 + frame.slot * i as f64 + (frame.slot - group_width) / 2.0;
        for (j, group) in groups.iter().enumerate() {
            let value = group.values.get(i).copied().unwrap_or(MISSING_THROUGHPUT);
            if value <= 0.0 {
                continue;
            }
            let x = group_x + bar_width * j as f64;
            let y = frame.y_of(value);
            let h = frame.y1 - y;
            let _ = writeln!(
                svg,
                "  <rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{bar_width:.2}\" height=\"{h:.2}\" fill=\"{}\"/>",
                color(group.strategy)
            );
            let _ = writeln!(
                svg,
                "  <rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{bar_width:.2}\" height=\"{h:.2}\" fill=\"url(#hatch-{})\" class=\"bar\"/>",
                group.strategy.token()
            );
        }
    }

    frame.category_labels(&mut svg, categories);
    frame.end(svg, groups)
}

/// Render a line chart with one marker per category.
///
/// Missing values are left out of the curve rather than drawn at zero.
pub fn line_chart(
    title: &str,
    x_label: &str,
    y_label: &str,
    categories: &[String],
    groups: &[ChartSeries],
    opts: &ChartOptions,
) -> String {
    let rotate = categories.len() > ROTATE_AFTER;
    let frame = Frame::new(opts, categories.len(), groups, rotate);
    let mut svg = frame.begin(title, x_label, y_label);

    for group in groups {
        let points: Vec<(f64, f64)> = group
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .map(|(i, &v)| (frame.x_center(i), frame.y_of(v)))
            .collect();

        let polyline = points
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            svg,
            "  <polyline points=\"{polyline}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" stroke-dasharray=\"{}\"/>",
            color(group.strategy),
            dash(group.strategy)
        );
        for &(x, y) in &points {
            marker(&mut svg, group.strategy, x, y);
        }
    }

    frame.category_labels(&mut svg, categories);
    frame.end(svg, groups)
}

fn marker(svg: &mut String, strategy: Strategy, x: f64, y: f64) {
    let fill = color(strategy);
    let _ = match strategy {
        Strategy::Serial => writeln!(
            svg,
            "  <circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"4\" fill=\"{fill}\"/>"
        ),
        Strategy::Static => writeln!(
            svg,
            "  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"8\" height=\"8\" fill=\"{fill}\"/>",
            x - 4.0,
            y - 4.0
        ),
        Strategy::NnzBalanced => writeln!(
            svg,
            "  <polygon points=\"{x:.2},{:.2} {:.2},{:.2} {:.2},{:.2}\" fill=\"{fill}\"/>",
            y - 5.0,
            x - 5.0,
            y + 4.0,
            x + 5.0,
            y + 4.0
        ),
    };
}

/// Plot-area geometry and y scale shared by both chart kinds.
struct Frame {
    width: f64,
    height: f64,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    slot: f64,
    y_max: f64,
    rotate_labels: bool,
}

impl Frame {
    fn new(
        opts: &ChartOptions,
        categories: usize,
        groups: &[ChartSeries],
        rotate_labels: bool,
    ) -> Self {
        let width = f64::from(opts.width);
        let height = f64::from(opts.height);
        let x0 = MARGIN_LEFT;
        let x1 = width - MARGIN_RIGHT;
        let peak = groups
            .iter()
            .flat_map(|g| g.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);

        Self {
            width,
            height,
            x0,
            x1,
            y0: MARGIN_TOP,
            y1: height - MARGIN_BOTTOM,
            slot: (x1 - x0) / categories.max(1) as f64,
            y_max: nice_ceiling(peak * 1.1),
            rotate_labels,
        }
    }

    fn y_of(&self, value: f64) -> f64 {
        self.y1 - (value / self.y_max).min(1.0) * (self.y1 - self.y0)
    }

    fn x_center(&self, idx: usize) -> f64 {
        self.x0 + self.slot * (idx as f64 + 0.5)
    }

    /// Document header, hatch patterns, title, grid, y ticks and axis labels.
    fn begin(&self, title: &str, x_label: &str, y_label: &str) -> String {
        let mut svg = String::new();
        let (w, h) = (self.width, self.height);

        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
        );
        svg.push_str("  <style>\n");
        svg.push_str("    text { font-family: sans-serif; font-size: 12px; }\n");
        svg.push_str("    .title { font-size: 15px; font-weight: bold; }\n");
        svg.push_str("    .axis-label { font-size: 13px; font-weight: bold; }\n");
        svg.push_str("    .grid { stroke: #999; stroke-opacity: 0.35; stroke-dasharray: 4,3; }\n");
        svg.push_str("    .bar { stroke: black; stroke-width: 0.8; }\n");
        svg.push_str("  </style>\n");
        svg.push_str("  <defs>\n");
        hatch(&mut svg, Strategy::Serial, "M0,8 L8,0");
        hatch(&mut svg, Strategy::Static, "M0,0 L8,8");
        hatch(&mut svg, Strategy::NnzBalanced, "M0,8 L8,0 M0,0 L8,8");
        svg.push_str("  </defs>\n");
        svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
        let _ = writeln!(
            svg,
            "  <text x=\"{:.1}\" y=\"30\" text-anchor=\"middle\" class=\"title\">{}</text>",
            w / 2.0,
            escape(title)
        );

        let step = self.y_max / f64::from(Y_TICKS);
        for i in 0..=Y_TICKS {
            let value = step * f64::from(i);
            let y = self.y_of(value);
            let _ = writeln!(
                svg,
                "  <line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" class=\"grid\"/>",
                self.x0, self.x1
            );
            let _ = writeln!(
                svg,
                "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\">{}</text>",
                self.x0 - 6.0,
                y + 4.0,
                format_tick(value, step)
            );
        }

        let _ = writeln!(
            svg,
            "  <line x1=\"{x0:.2}\" y1=\"{y0:.2}\" x2=\"{x0:.2}\" y2=\"{y1:.2}\" stroke=\"black\"/>",
            x0 = self.x0,
            y0 = self.y0,
            y1 = self.y1
        );
        let _ = writeln!(
            svg,
            "  <line x1=\"{:.2}\" y1=\"{y1:.2}\" x2=\"{:.2}\" y2=\"{y1:.2}\" stroke=\"black\"/>",
            self.x0,
            self.x1,
            y1 = self.y1
        );
        let _ = writeln!(
            svg,
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" class=\"axis-label\">{}</text>",
            (self.x0 + self.x1) / 2.0,
            h - 12.0,
            escape(x_label)
        );
        let (lx, ly) = (20.0, (self.y0 + self.y1) / 2.0);
        let _ = writeln!(
            svg,
            "  <text x=\"{lx:.2}\" y=\"{ly:.2}\" text-anchor=\"middle\" transform=\"rotate(-90 {lx:.2} {ly:.2})\" class=\"axis-label\">{}</text>",
            escape(y_label)
        );

        svg
    }

    fn category_labels(&self, svg: &mut String, categories: &[String]) {
        for (i, label) in categories.iter().enumerate() {
            let x = self.x_center(i);
            let y = self.y1 + 18.0;
            if self.rotate_labels {
                let _ = writeln!(
                    svg,
                    "  <text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"end\" transform=\"rotate(-25 {x:.2} {y:.2})\">{}</text>",
                    escape(label)
                );
            } else {
                let _ = writeln!(
                    svg,
                    "  <text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\">{}</text>",
                    escape(label)
                );
            }
        }
    }

    /// Legend and closing tag.
    fn end(&self, mut svg: String, groups: &[ChartSeries]) -> String {
        let x = self.x1 - 190.0;
        for (i, group) in groups.iter().enumerate() {
            let y = self.y0 + 8.0 + 20.0 * i as f64;
            let _ = writeln!(
                svg,
                "  <rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"14\" height=\"12\" fill=\"{}\" stroke=\"black\" stroke-width=\"0.8\"/>",
                color(group.strategy)
            );
            let _ = writeln!(
                svg,
                "  <text x=\"{:.2}\" y=\"{:.2}\">{}</text>",
                x + 20.0,
                y + 11.0,
                group.strategy.label()
            );
        }
        svg.push_str("</svg>\n");
        svg
    }
}

fn hatch(svg: &mut String, strategy: Strategy, path: &str) {
    let _ = writeln!(
        svg,
        "    <pattern id=\"hatch-{}\" width=\"8\" height=\"8\" patternUnits=\"userSpaceOnUse\"><path d=\"{path}\" stroke=\"black\" stroke-width=\"0.7\"/></pattern>",
        strategy.token()
    );
}

/// Round up to 1, 2 or 5 times a power of ten.
fn nice_ceiling(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10_f64.powf(value.log10().floor());
    let fraction = value / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    format!("{value:.decimals$}")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_text;

    fn series(text: &str) -> MatrixSeries {
        MatrixSeries::from_record(&parse_text("test.csv", text).unwrap())
    }

    #[test]
    fn nice_ceiling_steps() {
        assert_eq!(nice_ceiling(0.0), 1.0);
        assert_eq!(nice_ceiling(0.7), 1.0);
        assert_eq!(nice_ceiling(1.3), 2.0);
        assert_eq!(nice_ceiling(3.0), 5.0);
        assert_eq!(nice_ceiling(70.0), 100.0);
        assert!((nice_ceiling(0.013) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn tick_precision_follows_step() {
        assert_eq!(format_tick(10.0, 2.0), "10");
        assert_eq!(format_tick(0.4, 0.2), "0.4");
        assert_eq!(format_tick(0.04, 0.02), "0.04");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn bar_chart_draws_present_bars_only() {
        let s = series("# cage14 1 1 27130349\n1,serial,2.1\n4,static,0.6\n4,nnzbal,0.55\n");
        let svg = matrix_bar_chart(&s, &[1, 4], &ChartOptions::default());

        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Matrix: cage14"));
        // Serial at 1 and 4, static and nnzbal at 4 only: two rects per bar.
        assert_eq!(svg.matches("class=\"bar\"").count(), 4);
        assert!(svg.contains("url(#hatch-nnzbal)"));
        assert!(svg.contains("NNZ-Balanced Scheduling"));
    }

    #[test]
    fn line_chart_skips_missing_points() {
        let s = series("# m 1 1 1000000\n1,serial,1.0\n2,static,0.5\n8,static,0.2\n");
        let svg = matrix_line_chart(&s, &[2, 4, 8], &ChartOptions::default());

        assert_eq!(svg.matches("<polyline").count(), 3);
        assert_eq!(svg.matches("<circle").count(), 3);
        // Static markers at 2 and 8 only.
        assert_eq!(svg.matches("width=\"8\" height=\"8\" fill").count(), 2);
        assert!(!svg.contains("<polygon"));
    }

    #[test]
    fn comparison_chart_labels_each_matrix() {
        let a = series("# a&b 1 1 100\n1,serial,1.0\n64,static,0.1\n");
        let b = series("# beta 1 1 100\n1,serial,1.0\n");
        let opts = ChartOptions {
            width: 640,
            height: 360,
            title_prefix: "Test".into(),
        };
        let svg = comparison_chart(&[a, b], 64, &opts);

        assert!(svg.contains("width=\"640\""));
        assert!(svg.contains("Test GFLOP/s Comparison Across Matrices"));
        assert!(svg.contains("GFLOP/s - 64 Threads"));
        assert!(svg.contains(">a&amp;b</text>"));
        assert!(svg.contains(">beta</text>"));
        assert_eq!(svg.matches("rotate(-25").count(), 2);
    }

    #[test]
    fn short_numeric_axes_stay_level() {
        let s = series("# m 1 1 1000000\n1,serial,1.0\n2,static,0.5\n");
        let svg = matrix_bar_chart(&s, &[1, 2, 4], &ChartOptions::default());
        assert!(!svg.contains("rotate(-25"));
    }
}
