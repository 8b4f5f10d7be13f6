//! Terminal renderers for the dashboard.
//!
//! Renderers return strings so the caller decides where they go (stdout,
//! a cleared screen, a test assertion).

use console::Style;

use crate::dashboard::data::{Alert, DashboardData, MetricBlock, Subsystem};

/// Sparkline glyphs, lowest to highest
const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Glyph used for bar charts
const BAR_GLYPH: char = '█';

/// Default bar chart width in cells
pub const DEFAULT_CHART_WIDTH: usize = 30;

// ═══════════════════════════════════════════════════════════════════════════════
// PALETTE
// ═══════════════════════════════════════════════════════════════════════════════

/// Applies styles only when color is on
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    color: bool,
}

impl Palette {
    /// Create a palette
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Style `text` when color is enabled
    pub fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Bold
    pub fn bold(&self, text: &str) -> String {
        self.paint(text, Style::new().bold())
    }

    /// Section heading
    pub fn heading(&self, text: &str) -> String {
        self.paint(&format!("=== {} ===", text), Style::new().cyan().bold())
    }

    /// Dimmed secondary text
    pub fn dim(&self, text: &str) -> String {
        self.paint(text, Style::new().dim())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DASHBOARD RENDERER
// ═══════════════════════════════════════════════════════════════════════════════

/// Renders metrics, alerts and charts
#[derive(Debug, Clone, Copy)]
pub struct DashboardRenderer {
    palette: Palette,
    chart_width: usize,
}

impl Default for DashboardRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DashboardRenderer {
    /// Create a renderer
    pub fn new(color: bool) -> Self {
        Self {
            palette: Palette::new(color),
            chart_width: DEFAULT_CHART_WIDTH,
        }
    }

    /// Set the bar chart width
    pub fn with_chart_width(mut self, width: usize) -> Self {
        self.chart_width = width.max(1);
        self
    }

    /// Full dashboard
    pub fn render(&self, data: &DashboardData) -> String {
        let mut out = String::new();
        out.push_str(&self.metrics(data));
        out.push('\n');
        out.push_str(&self.alerts(&data.alerts));
        out.push('\n');
        out.push_str(&self.charts(data));
        out
    }

    /// One block per subsystem
    pub fn metrics(&self, data: &DashboardData) -> String {
        let mut out = String::new();
        for (subsystem, block) in data.metrics() {
            out.push_str(&self.metric_block(subsystem, block));
        }
        out
    }

    fn metric_block(&self, subsystem: Subsystem, block: &MetricBlock) -> String {
        let p = &self.palette;
        let status_style = if block.is_healthy() {
            Style::new().green().bold()
        } else {
            Style::new().red().bold()
        };

        format!(
            "{}\n  {:<12}{}\n  {:<12}{}\n  {:<12}{}\n",
            p.heading(&format!("{} Metrics", subsystem.label())),
            "Status",
            p.paint(&block.status, status_style),
            "Open Issues",
            p.bold(&block.open_issues.to_string()),
            "Last Update",
            p.bold(&block.last_update.format("%Y-%m-%d %H:%M UTC").to_string()),
        )
    }

    /// Alert list in payload order
    pub fn alerts(&self, alerts: &[Alert]) -> String {
        let p = &self.palette;
        let mut out = format!("{}\n", p.heading("Alerts"));

        if alerts.is_empty() {
            out.push_str(&format!("  {}\n", p.dim("No active alerts")));
            return out;
        }

        for alert in alerts {
            let (marker, style) = if alert.severity.is_high() {
                ("🔴", Style::new().red().bold())
            } else {
                ("⚠️", Style::new().yellow().bold())
            };
            out.push_str(&format!("  {} {}\n", marker, p.paint(&alert.title, style)));
            if !alert.message.is_empty() {
                out.push_str(&format!("     {}\n", p.dim(&alert.message)));
            }
        }
        out
    }

    /// Activity sparkline and performance bars
    pub fn charts(&self, data: &DashboardData) -> String {
        let p = &self.palette;
        let mut out = String::new();

        out.push_str(&format!("{}\n", p.heading("Commits")));
        let activity = data.activity_data.points();
        if activity.is_empty() {
            out.push_str(&format!("  {}\n", p.dim("(no data)")));
        } else {
            let values: Vec<f64> = activity.iter().map(|(_, v)| *v).collect();
            let line = sparkline(&values);
            let label_width = label_width(&activity);
            for ((label, value), glyph) in activity.iter().zip(line.chars()) {
                out.push_str(&format!(
                    "  {:<width$} {} {}\n",
                    label,
                    p.paint(&glyph.to_string(), Style::new().blue()),
                    format_value(*value),
                    width = label_width
                ));
            }
            out.push_str(&format!("  {}\n", p.paint(&line, Style::new().blue())));
        }

        out.push_str(&format!("{}\n", p.heading("Performance Score")));
        let performance = data.performance_data.points();
        if performance.is_empty() {
            out.push_str(&format!("  {}\n", p.dim("(no data)")));
        } else {
            let values: Vec<f64> = performance.iter().map(|(_, v)| *v).collect();
            let label_width = label_width(&performance);
            for ((label, value), len) in performance.iter().zip(bar_lengths(&values, self.chart_width)) {
                let bar: String = std::iter::repeat(BAR_GLYPH).take(len).collect();
                // Pad before styling so escape codes don't count toward the width
                let bar = format!("{:<width$}", bar, width = self.chart_width);
                out.push_str(&format!(
                    "  {:<width$} {} {}\n",
                    label,
                    p.paint(&bar, Style::new().blue()),
                    format_value(*value),
                    width = label_width,
                ));
            }
        }

        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPER FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Map values onto sparkline glyphs, scaled between min and max
pub fn sparkline(values: &[f64]) -> String {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return values.iter().map(|_| SPARK_GLYPHS[0]).collect();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = (SPARK_GLYPHS.len() - 1) as f64;

    values
        .iter()
        .map(|v| {
            if !v.is_finite() || span <= 0.0 {
                return SPARK_GLYPHS[0];
            }
            let idx = (((v - min) / span) * top).round() as usize;
            SPARK_GLYPHS[idx.min(SPARK_GLYPHS.len() - 1)]
        })
        .collect()
}

/// Bar lengths scaled so the largest positive value fills `width`
pub fn bar_lengths(values: &[f64], width: usize) -> Vec<usize> {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(0.0_f64, f64::max);

    values
        .iter()
        .map(|v| {
            if max <= 0.0 || !v.is_finite() || *v <= 0.0 {
                0
            } else {
                ((v / max) * width as f64).round() as usize
            }
        })
        .collect()
}

fn label_width(points: &[(&str, f64)]) -> usize {
    points
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::data::{ActivitySeries, AlertSeverity, PerformanceSeries};
    use chrono::{TimeZone, Utc};

    fn sample() -> DashboardData {
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 9, 30, 0).unwrap();
        let mut data = DashboardData::placeholder(now);
        data.ai = MetricBlock::new("degraded", 14, now);
        data.alerts = vec![
            Alert::new(AlertSeverity::High, "AI backlog", "14 open issues"),
            Alert::new(AlertSeverity::Medium, "Slow build", ""),
        ];
        data.activity_data = ActivitySeries {
            labels: vec!["Mon".into(), "Tue".into(), "Wed".into()],
            commits: vec![1.0, 5.0, 3.0],
        };
        data.performance_data = PerformanceSeries {
            labels: vec!["POS".into(), "AI".into()],
            scores: vec![90.0, 45.0],
        };
        data
    }

    #[test]
    fn test_metrics_plain() {
        let out = DashboardRenderer::new(false).metrics(&sample());
        assert!(out.contains("=== POS Metrics ==="));
        assert!(out.contains("Status      healthy"));
        assert!(out.contains("Status      degraded"));
        assert!(out.contains("Open Issues 14"));
        assert!(out.contains("Last Update 2024-06-02 09:30 UTC"));
    }

    #[test]
    fn test_status_color_depends_on_health() {
        let out = DashboardRenderer::new(true).metrics(&sample());
        let green = Style::new().green().bold().force_styling(true).apply_to("healthy").to_string();
        let red = Style::new().red().bold().force_styling(true).apply_to("degraded").to_string();
        assert!(out.contains(&green));
        assert!(out.contains(&red));
    }

    #[test]
    fn test_alert_markers() {
        let out = DashboardRenderer::new(false).alerts(&sample().alerts);
        assert!(out.contains("🔴 AI backlog"));
        assert!(out.contains("14 open issues"));
        assert!(out.contains("⚠️ Slow build"));
    }

    #[test]
    fn test_no_alerts() {
        let out = DashboardRenderer::new(false).alerts(&[]);
        assert!(out.contains("No active alerts"));
    }

    #[test]
    fn test_charts_plain() {
        let out = DashboardRenderer::new(false).with_chart_width(10).charts(&sample());
        assert!(out.contains("▁█▅"));
        assert!(out.contains(&format!("POS {} 90", "█".repeat(10))));
        assert!(out.contains(&format!("AI  {:<10} 45", "█".repeat(5))));
    }

    #[test]
    fn test_colored_bars_keep_values_aligned() {
        let out = DashboardRenderer::new(true).with_chart_width(10).charts(&sample());
        let plain = console::strip_ansi_codes(&out).to_string();

        assert!(plain.contains(&format!("POS {} 90", "█".repeat(10))));
        assert!(plain.contains(&format!("AI  {:<10} 45", "█".repeat(5))));

        let column = |prefix: &str| {
            let line = plain.lines().find(|l| l.trim_start().starts_with(prefix)).unwrap();
            line.chars().count() - 2
        };
        assert_eq!(column("POS █"), column("AI "));
    }

    #[test]
    fn test_empty_charts() {
        let data = DashboardData::placeholder(Utc::now());
        let out = DashboardRenderer::new(false).charts(&data);
        assert_eq!(out.matches("(no data)").count(), 2);
    }

    #[test]
    fn test_sparkline_flat_series() {
        assert_eq!(sparkline(&[3.0, 3.0, 3.0]), "▁▁▁");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn test_bar_lengths_zero_and_negative() {
        assert_eq!(bar_lengths(&[0.0, 0.0], 20), vec![0, 0]);
        assert_eq!(bar_lengths(&[-5.0, 10.0], 20), vec![0, 20]);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(42.0), "42");
        assert_eq!(format_value(87.56), "87.6");
    }

    #[test]
    fn test_render_combines_sections() {
        let out = DashboardRenderer::new(false).render(&sample());
        assert!(out.contains("=== Alerts ==="));
        assert!(out.contains("=== Commits ==="));
        assert!(out.contains("=== Performance Score ==="));
    }
}
