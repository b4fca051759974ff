//! Bar chart rendering using Plotters

use std::path::Path;

use plotters::prelude::*;
use tracing::{info, warn};

use crate::chart::{BarChart, Renderer};

/// Colors for successive series
const SERIES_COLORS: [RGBColor; 4] = [BLUE, RED, GREEN, MAGENTA];

/// Total width taken by all bars of one category
const GROUP_WIDTH: f64 = 0.8;

/// PNG renderer backed by the Plotters bitmap backend
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            font_size: 18,
        }
    }
}

impl Renderer for PlottersRenderer {
    fn render(&self, chart: &BarChart, path: &Path) -> anyhow::Result<()> {
        let categories: Vec<String> = chart.categories().into_iter().map(str::to_string).collect();
        let n_categories = categories.len().max(1);
        let (lo, hi) = chart.value_range();
        let pad = ((hi - lo) * 0.1).max(0.05);

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut plot = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", self.font_size * 2))
            .margin(20)
            .x_label_area_size(self.font_size * 8)
            .y_label_area_size(self.font_size * 4)
            .build_cartesian_2d(-0.5f64..(n_categories as f64 - 0.5), (lo - pad)..(hi + pad))?;

        let label_for = |x: &f64| {
            let idx = x.round();
            if (x - idx).abs() < 1e-6 && idx >= 0.0 {
                categories.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };

        plot.configure_mesh()
            .disable_x_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(n_categories)
            .x_label_formatter(&label_for)
            .x_label_style(
                ("sans-serif", self.font_size)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_label_formatter(&|y| format!("{:.2}", y))
            .axis_desc_style(("sans-serif", self.font_size))
            .draw()?;

        // Zero line
        plot.draw_series(std::iter::once(PathElement::new(
            vec![(-0.5, 0.0), (n_categories as f64 - 0.5, 0.0)],
            BLACK,
        )))?;

        let n_series = chart.series.len().max(1);
        let bar_width = GROUP_WIDTH / n_series as f64;

        for (series_idx, series) in chart.series.iter().enumerate() {
            let color = SERIES_COLORS[series_idx % SERIES_COLORS.len()];
            let offset = -GROUP_WIDTH / 2.0 + bar_width * series_idx as f64;

            let bars: Vec<Rectangle<(f64, f64)>> = series
                .points
                .iter()
                .enumerate()
                .filter_map(|(i, point)| {
                    if !point.value.is_finite() {
                        warn!("Skipping bar '{}' in '{}': value is {}", point.label, series.name, point.value);
                        return None;
                    }
                    let left = i as f64 + offset;
                    Some(Rectangle::new(
                        [(left, 0.0), (left + bar_width, point.value)],
                        color.filled(),
                    ))
                })
                .collect();

            let drawn = plot.draw_series(bars)?;
            if chart.series.len() > 1 {
                drawn
                    .label(series.name.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            }
        }

        if chart.series.len() > 1 {
            plot.configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(("sans-serif", self.font_size))
                .draw()?;
        }

        root.present()?;
        info!("Chart '{}' saved to: {}", chart.title, path.display());

        Ok(())
    }
}
