use super::{centered, diverging, Chart, DrawResult, FONT, FRAUD_COLOR, LEGIT_COLOR};
use crate::evaluation::dataset::Dataset;
use crate::models::application::FEATURE_NAMES;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

pub const DISTRIBUTION_FEATURES: [&str; 6] = [
    "ltv",
    "credit_score",
    "ocr_confidence",
    "valuation_diff_pct",
    "loan_amount",
    "income",
];
pub const DISTRIBUTION_BINS: usize = 30;

/// Feature names paired with their importance, most important first.
pub fn ranked_importances(importances: &[f64]) -> Vec<(&'static str, f64)> {
    let mut ranked: Vec<(&'static str, f64)> = FEATURE_NAMES
        .iter()
        .copied()
        .zip(importances.iter().copied())
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Histogram normalised to unit area over `[lo, hi]`.
pub fn density(values: &[f64], lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let mut counts = vec![0usize; bins];
    let width = (hi - lo) / bins as f64;
    if bins == 0 || width <= 0.0 || values.is_empty() {
        return vec![0.0; bins];
    }
    for &v in values {
        if !(lo..=hi).contains(&v) {
            continue;
        }
        let bin = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }
    let total = values.len() as f64 * width;
    counts.into_iter().map(|c| c as f64 / total).collect()
}

pub struct FeatureImportance<'a> {
    pub importances: &'a [f64],
}

impl Chart for FeatureImportance<'_> {
    const NAME: &'static str = "feature_importance";

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;

        let ranked = ranked_importances(self.importances);
        let n = ranked.len().max(1);
        let top = ranked.first().map_or(0.0, |(_, v)| *v).max(1e-6) * 1.15;

        let mut chart = ChartBuilder::on(root)
            .caption("Feature Importance for Fraud Detection", (FONT, 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(190)
            .build_cartesian_2d(0.0..top, (0..n - 1).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Importance")
            .y_labels(n)
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(row) => n
                    .checked_sub(row + 1)
                    .and_then(|rank| ranked.get(rank))
                    .map(|(name, _)| name.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(ranked.iter().enumerate().map(|(rank, (_, value))| {
            let row = n - 1 - rank;
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(row)),
                    (*value, SegmentValue::Exact(row + 1)),
                ],
                LEGIT_COLOR.mix(0.85).filled(),
            );
            bar.set_margin(6, 6, 0, 0);
            bar
        }))?;

        let value_style =
            TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
        chart.draw_series(ranked.iter().enumerate().map(|(rank, (_, value))| {
            Text::new(
                format!(" {value:.3}"),
                (*value, SegmentValue::CenterOf(n - 1 - rank)),
                value_style.clone(),
            )
        }))?;

        Ok(())
    }
}

/// Lower-triangle Pearson matrix over the full dataset.
pub struct CorrelationHeatmap<'a> {
    pub correlations: &'a [Vec<f64>],
}

impl Chart for CorrelationHeatmap<'_> {
    const NAME: &'static str = "correlation_heatmap";
    const SIZE: (u32, u32) = (1100, 1000);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;

        let n = self.correlations.len().max(1);
        let name_of = |index: usize| FEATURE_NAMES.get(index).copied().unwrap_or("").to_string();

        let mut chart = ChartBuilder::on(root)
            .caption("Feature Correlation Matrix", (FONT, 26))
            .margin(20)
            .x_label_area_size(170)
            .y_label_area_size(190)
            .build_cartesian_2d((0..n - 1).into_segmented(), (0..n - 1).into_segmented())?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_style(
                TextStyle::from((FONT, 14).into_font()).transform(FontTransform::Rotate90),
            )
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(col) => name_of(*col),
                _ => String::new(),
            })
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(row) => n.checked_sub(row + 1).map(name_of).unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        let cells: Vec<(usize, usize, f64)> = self
            .correlations
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().take(i + 1).enumerate().map(move |(j, r)| (i, j, *r)))
            .collect();

        chart.draw_series(cells.iter().map(|&(i, j, r)| {
            let y = n - 1 - i;
            let mut cell = Rectangle::new(
                [
                    (SegmentValue::Exact(j), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(j + 1), SegmentValue::Exact(y + 1)),
                ],
                diverging(r).filled(),
            );
            cell.set_margin(1, 1, 1, 1);
            cell
        }))?;

        chart.draw_series(cells.iter().map(|&(i, j, r)| {
            let label = if r.is_nan() { "n/a".to_string() } else { format!("{r:.2}") };
            Text::new(
                label,
                (SegmentValue::CenterOf(j), SegmentValue::CenterOf(n - 1 - i)),
                centered(13.0).color(if r.abs() > 0.6 { &WHITE } else { &BLACK }),
            )
        }))?;

        Ok(())
    }
}

/// Fraud vs legitimate densities for the six most telling features.
pub struct FeatureDistributions<'a> {
    pub dataset: &'a Dataset,
}

impl Chart for FeatureDistributions<'_> {
    const NAME: &'static str = "feature_distributions";
    const SIZE: (u32, u32) = (1500, 900);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let root = root.titled("Feature Distributions: Fraud vs Legitimate", (FONT, 26))?;

        for (area, name) in root.split_evenly((2, 3)).iter().zip(DISTRIBUTION_FEATURES) {
            let Some(index) = FEATURE_NAMES.iter().position(|n| *n == name) else {
                continue;
            };
            let column = self.dataset.column(index);
            let (mut fraud, mut legit) = (Vec::new(), Vec::new());
            for (value, label) in column.iter().zip(&self.dataset.labels) {
                if *label == 1 {
                    fraud.push(*value);
                } else {
                    legit.push(*value);
                }
            }

            let lo = column.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let (lo, hi) = if lo.is_finite() && hi > lo {
                (lo, hi)
            } else {
                let centre = if lo.is_finite() { lo } else { 0.0 };
                (centre - 0.5, centre + 0.5)
            };
            let width = (hi - lo) / DISTRIBUTION_BINS as f64;

            let legit_density = density(&legit, lo, hi, DISTRIBUTION_BINS);
            let fraud_density = density(&fraud, lo, hi, DISTRIBUTION_BINS);
            let peak = legit_density
                .iter()
                .chain(&fraud_density)
                .copied()
                .fold(0.0, f64::max)
                .max(1e-9)
                * 1.1;

            let mut chart = ChartBuilder::on(area)
                .caption(name, (FONT, 18))
                .margin(12)
                .x_label_area_size(35)
                .y_label_area_size(60)
                .build_cartesian_2d(lo..hi, 0.0..peak)?;
            chart
                .configure_mesh()
                .y_desc("Density")
                .x_labels(5)
                .y_labels(5)
                .draw()?;

            for (densities, color, label) in [
                (&legit_density, LEGIT_COLOR, "Legitimate"),
                (&fraud_density, FRAUD_COLOR, "Fraud"),
            ] {
                chart
                    .draw_series(densities.iter().enumerate().map(|(bin, d)| {
                        let x0 = lo + bin as f64 * width;
                        Rectangle::new([(x0, 0.0), (x0 + width, *d)], color.mix(0.5).filled())
                    }))?
                    .label(label)
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.mix(0.5).filled())
                    });
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }

        Ok(())
    }
}
