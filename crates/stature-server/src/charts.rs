//! SVG charts drawn with plotters
//!
//! [`SvgCharts`] is the dashboard's [`Presenter`]: it turns one analysis into
//! a histogram, a boxplot and a pie chart. [`preview_table`] draws the first
//! rows of a loaded table as an image.

use std::f64::consts::PI;

use plotters::prelude::*;
use thiserror::Error;

use stature_core::{ChartConfig, Presenter};
use stature_io::{DataSlice, MeasurementSeries};
use stature_stats::{BoxSummary, Histogram, PercentageDistribution, SummaryStats};

const BAR: RGBColor = RGBColor(76, 120, 168);
const MEDIAN: RGBColor = RGBColor(228, 87, 86);
const GRID: RGBColor = RGBColor(210, 210, 210);
const HEADER: RGBColor = RGBColor(238, 241, 245);

const PALETTE: [RGBColor; 8] = [
    RGBColor(76, 120, 168),
    RGBColor(245, 133, 24),
    RGBColor(228, 87, 86),
    RGBColor(114, 183, 178),
    RGBColor(84, 162, 75),
    RGBColor(238, 202, 59),
    RGBColor(178, 121, 162),
    RGBColor(255, 157, 166),
];

const FONT: &str = "sans-serif";

/// Chart rendering error
#[derive(Debug, Error)]
pub enum ChartError {
    /// The backend failed to draw
    #[error("Failed to draw chart: {0}")]
    Drawing(String),

    /// The data cannot be charted
    #[error("Cannot chart data: {0}")]
    Data(String),
}

fn drawing<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Drawing(err.to_string())
}

/// The three charts for one analysis, as SVG documents
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub histogram: String,
    pub boxplot: String,
    /// `None` when no value falls in any range
    pub pie: Option<String>,
}

/// Plotters-backed presenter
#[derive(Debug, Clone)]
pub struct SvgCharts {
    width: u32,
    height: u32,
    histogram_buckets: Option<usize>,
}

impl SvgCharts {
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            histogram_buckets: config.histogram_buckets,
        }
    }

    /// Frequency histogram of the present values
    pub fn histogram(&self, column: &str, data: &[f64]) -> Result<String, ChartError> {
        let hist = match self.histogram_buckets {
            Some(n) => Histogram::with_buckets(data, n),
            None => Histogram::sturges(data),
        }
        .map_err(|e| ChartError::Data(e.to_string()))?;

        let (x0, x1) = match (hist.buckets.first(), hist.buckets.last()) {
            (Some(first), Some(last)) => (first.lower, last.upper),
            _ => return Err(ChartError::Data("histogram has no buckets".to_string())),
        };
        let y1 = (hist.max_count() as f64 * 1.1).max(1.0);

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE).map_err(drawing)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(format!("Distribution of \"{}\"", column), (FONT, 20))
                .margin(12)
                .x_label_area_size(40)
                .y_label_area_size(48)
                .build_cartesian_2d(x0..x1, 0f64..y1)
                .map_err(drawing)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .light_line_style(GRID)
                .x_desc(column)
                .y_desc("Frequency")
                .draw()
                .map_err(drawing)?;

            chart
                .draw_series(hist.buckets.iter().map(|b| {
                    Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], BAR.filled())
                }))
                .map_err(drawing)?;
            chart
                .draw_series(hist.buckets.iter().map(|b| {
                    Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], WHITE.stroke_width(1))
                }))
                .map_err(drawing)?;

            root.present().map_err(drawing)?;
        }
        Ok(svg)
    }

    /// Vertical boxplot with Tukey whiskers
    pub fn boxplot(&self, column: &str, data: &[f64]) -> Result<String, ChartError> {
        let summary = BoxSummary::from_data(data).map_err(|e| ChartError::Data(e.to_string()))?;

        let lo = summary
            .outliers
            .first()
            .map_or(summary.lower_whisker, |o| o.min(summary.lower_whisker));
        let hi = summary
            .outliers
            .last()
            .map_or(summary.upper_whisker, |o| o.max(summary.upper_whisker));
        let pad = if hi > lo { (hi - lo) * 0.1 } else { lo.abs().max(1.0) * 0.05 };

        let (left, right, mid) = (0.3, 0.7, 0.5);
        let cap = 0.08;

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE).map_err(drawing)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(format!("Boxplot of \"{}\"", column), (FONT, 20))
                .margin(12)
                .y_label_area_size(56)
                .build_cartesian_2d(0f64..1f64, (lo - pad)..(hi + pad))
                .map_err(drawing)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_x_axis()
                .light_line_style(GRID)
                .y_desc(column)
                .draw()
                .map_err(drawing)?;

            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(left, summary.q1), (right, summary.q3)],
                    BAR.mix(0.35).filled(),
                )))
                .map_err(drawing)?;
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(left, summary.q1), (right, summary.q3)],
                    BAR.stroke_width(2),
                )))
                .map_err(drawing)?;

            let whiskers = vec![
                vec![(mid, summary.q3), (mid, summary.upper_whisker)],
                vec![(mid, summary.q1), (mid, summary.lower_whisker)],
                vec![(mid - cap, summary.upper_whisker), (mid + cap, summary.upper_whisker)],
                vec![(mid - cap, summary.lower_whisker), (mid + cap, summary.lower_whisker)],
            ];
            chart
                .draw_series(whiskers.into_iter().map(|line| PathElement::new(line, BAR.stroke_width(2))))
                .map_err(drawing)?;

            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(left, summary.median), (right, summary.median)],
                    MEDIAN.stroke_width(3),
                )))
                .map_err(drawing)?;

            chart
                .draw_series(
                    summary
                        .outliers
                        .iter()
                        .map(|y| Circle::new((mid, *y), 4, BAR.filled())),
                )
                .map_err(drawing)?;

            root.present().map_err(drawing)?;
        }
        Ok(svg)
    }

    /// Pie chart of the per-range percentages
    ///
    /// Zero slices are left out of the drawing but stay in the legend.
    pub fn pie(&self, distribution: &PercentageDistribution) -> Result<String, ChartError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE).map_err(drawing)?;
            let area = root
                .titled("Height ranges", (FONT, 20))
                .map_err(drawing)?;

            let (w, h) = area.dim_in_pixel();
            let radius = (f64::from(w.min(h)) * 0.42).max(10.0);
            let center = (f64::from(w) * 0.35, f64::from(h) * 0.5);

            let mut start = -PI / 2.0;
            for (i, (_, percent)) in distribution.iter().enumerate() {
                if percent <= 0.0 {
                    continue;
                }
                let sweep = percent / 100.0 * 2.0 * PI;
                let color = PALETTE[i % PALETTE.len()];
                area.draw(&Polygon::new(
                    slice_points(center, radius, start, sweep),
                    color.filled(),
                ))
                .map_err(drawing)?;

                let middle = start + sweep / 2.0;
                let text_at = (
                    (center.0 + radius * 0.65 * middle.cos()) as i32 - 18,
                    (center.1 + radius * 0.65 * middle.sin()) as i32 - 7,
                );
                area.draw(&Text::new(
                    format!("{:.1}%", percent),
                    text_at,
                    (FONT, 14).into_font().color(&WHITE),
                ))
                .map_err(drawing)?;

                start += sweep;
            }

            let legend_x = (f64::from(w) * 0.72) as i32;
            for (i, (label, percent)) in distribution.iter().enumerate() {
                let y = 30 + i as i32 * 26;
                let color = PALETTE[i % PALETTE.len()];
                area.draw(&Rectangle::new(
                    [(legend_x, y), (legend_x + 14, y + 14)],
                    color.filled(),
                ))
                .map_err(drawing)?;
                area.draw(&Text::new(
                    format!("{}  {:.1}%", label, percent),
                    (legend_x + 22, y),
                    (FONT, 14).into_font(),
                ))
                .map_err(drawing)?;
            }

            root.present().map_err(drawing)?;
        }
        Ok(svg)
    }
}

/// Outline of one pie slice, starting at the centre
fn slice_points(center: (f64, f64), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep / (2.0 * PI) * 180.0).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push((center.0 as i32, center.1 as i32));
    for step in 0..=steps {
        let angle = start + sweep * step as f64 / steps as f64;
        points.push((
            (center.0 + radius * angle.cos()).round() as i32,
            (center.1 + radius * angle.sin()).round() as i32,
        ));
    }
    points
}

impl Presenter for SvgCharts {
    type Output = ChartSet;
    type Error = ChartError;

    fn render(
        &self,
        _summary: &SummaryStats,
        distribution: Option<&PercentageDistribution>,
        series: &MeasurementSeries,
    ) -> Result<ChartSet, ChartError> {
        Ok(ChartSet {
            histogram: self.histogram(&series.name, series.values())?,
            boxplot: self.boxplot(&series.name, series.values())?,
            pie: distribution.map(|d| self.pie(d)).transpose()?,
        })
    }
}

const CELL_HEIGHT: u32 = 26;
const CHAR_WIDTH: u32 = 8;
const MAX_CELL_CHARS: usize = 24;

/// Draw the first rows of a table as a grid
pub fn preview_table(slice: &DataSlice) -> Result<String, ChartError> {
    let header: Vec<String> = std::iter::once("#".to_string())
        .chain(slice.column_names().into_iter().map(clip))
        .collect();
    let rows: Vec<Vec<String>> = slice
        .rows_text()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            std::iter::once((slice.start + i).to_string())
                .chain(row.iter().map(|cell| clip(cell)))
                .collect()
        })
        .collect();

    let widths: Vec<u32> = (0..header.len())
        .map(|col| {
            let chars = rows
                .iter()
                .map(|r| r[col].chars().count())
                .chain(std::iter::once(header[col].chars().count()))
                .max()
                .unwrap_or(1);
            chars as u32 * CHAR_WIDTH + 16
        })
        .collect();

    let width = widths.iter().sum::<u32>().max(120);
    let height = CELL_HEIGHT * (rows.len() as u32 + 1);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;
        root.draw(&Rectangle::new(
            [(0, 0), (width as i32, CELL_HEIGHT as i32)],
            HEADER.filled(),
        ))
        .map_err(drawing)?;

        let font = (FONT, 13).into_font();
        for (r, cells) in std::iter::once(&header).chain(rows.iter()).enumerate() {
            let y = (r as u32 * CELL_HEIGHT) as i32;
            let mut x = 0i32;
            for (cell, w) in cells.iter().zip(&widths) {
                root.draw(&Text::new(cell.clone(), (x + 8, y + 7), font.clone()))
                    .map_err(drawing)?;
                x += *w as i32;
            }
            root.draw(&PathElement::new(
                vec![(0, y + CELL_HEIGHT as i32 - 1), (width as i32, y + CELL_HEIGHT as i32 - 1)],
                GRID.stroke_width(1),
            ))
            .map_err(drawing)?;
        }

        root.present().map_err(drawing)?;
    }
    Ok(svg)
}

fn clip(text: &str) -> String {
    let clean: String = text.chars().filter(|c| !c.is_control()).collect();
    if clean.chars().count() > MAX_CELL_CHARS {
        let mut short: String = clean.chars().take(MAX_CELL_CHARS - 1).collect();
        short.push('…');
        short
    } else {
        clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stature_stats::{distribute, BinDefinition};

    fn charts() -> SvgCharts {
        SvgCharts::new(&ChartConfig::default())
    }

    #[test]
    fn test_histogram_svg() {
        let svg = charts()
            .histogram("Alt", &[1.40, 1.55, 1.65, 1.75, 1.85])
            .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Frequency"));
    }

    #[test]
    fn test_histogram_constant_series() {
        let svg = charts().histogram("Alt", &[1.6, 1.6, 1.6]).unwrap();
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_histogram_no_data() {
        let err = charts().histogram("Alt", &[f64::NAN]).unwrap_err();
        assert!(matches!(err, ChartError::Data(_)));
    }

    #[test]
    fn test_boxplot_with_outlier() {
        let svg = charts()
            .boxplot("Alt", &[1.60, 1.62, 1.64, 1.66, 1.68, 2.50])
            .unwrap();
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn test_pie_labels_every_range() {
        let counts = distribute(&BinDefinition::height_ranges(), &[1.6, 1.6, 1.6]);
        let svg = charts().pie(&counts.percentages().unwrap()).unwrap();

        for label in ["150-160", "160-170", "170-180"] {
            assert!(svg.contains(label), "missing legend entry {}", label);
        }
        assert!(svg.contains("100.0%"));
    }

    #[test]
    fn test_render_all_three() {
        let series = MeasurementSeries::new("Alt", vec![1.40, 1.55, 1.65, 1.75, 1.85]);
        let distribution = distribute(&BinDefinition::height_ranges(), series.values())
            .percentages()
            .unwrap();
        let summary = SummaryStats::from_data(series.values()).unwrap();

        let set = charts().render(&summary, Some(&distribution), &series).unwrap();
        assert!(set.histogram.contains("<svg"));
        assert!(set.boxplot.contains("<svg"));
        assert!(set.pie.unwrap().contains("<svg"));
    }

    #[test]
    fn test_render_without_distribution_skips_pie() {
        let series = MeasurementSeries::new("Alt", vec![-1.0, -2.0, -3.0]);
        let summary = SummaryStats::from_data(series.values()).unwrap();

        let set = charts().render(&summary, None, &series).unwrap();
        assert!(set.histogram.contains("<svg"));
        assert!(set.boxplot.contains("<svg"));
        assert!(set.pie.is_none());
    }

    #[test]
    fn test_slice_points_closed_fan() {
        let points = slice_points((100.0, 100.0), 50.0, 0.0, PI);
        assert_eq!(points[0], (100, 100));
        assert_eq!(points[1], (150, 100));
        assert_eq!(*points.last().unwrap(), (50, 100));
    }

    #[test]
    fn test_clip_long_cells() {
        let long = "x".repeat(40);
        assert_eq!(clip(&long).chars().count(), MAX_CELL_CHARS);
        assert_eq!(clip("1.62"), "1.62");
    }
}
