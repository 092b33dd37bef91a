use super::{diverging, Chart, DrawResult, FONT};
use crate::evaluation::SPLIT_SEED;
use crate::models::application::FEATURE_NAMES;
use plotters::coord::Shift;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const JITTER: f64 = 0.3;

/// Beeswarm of per-sample SHAP values, one lane per feature ordered by mean
/// absolute impact, each dot coloured by the sample's scaled feature value.
pub struct ShapSummary<'a> {
    pub shap_values: &'a [Vec<f64>],
    pub scaled_rows: &'a [Vec<f64>],
}

impl ShapSummary<'_> {
    /// Feature indices by descending mean |SHAP|.
    pub fn lane_order(&self) -> Vec<usize> {
        let n = FEATURE_NAMES.len();
        let mut impact = vec![0.0; n];
        for row in self.shap_values {
            for (total, v) in impact.iter_mut().zip(row) {
                *total += v.abs();
            }
        }
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|a, b| impact[*b].total_cmp(&impact[*a]));
        order
    }
}

impl Chart for ShapSummary<'_> {
    const NAME: &'static str = "shap_summary";
    const SIZE: (u32, u32) = (1100, 750);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;

        let order = self.lane_order();
        let n = order.len();
        let spread = self
            .shap_values
            .iter()
            .flatten()
            .fold(0.0f64, |acc, v| acc.max(v.abs()))
            .max(1e-6)
            * 1.1;

        // Per-feature min/max of the scaled inputs for the colour ramp.
        let mut bounds = vec![(f64::INFINITY, f64::NEG_INFINITY); n];
        for row in self.scaled_rows {
            for (bound, v) in bounds.iter_mut().zip(row) {
                bound.0 = bound.0.min(*v);
                bound.1 = bound.1.max(*v);
            }
        }

        let mut chart = ChartBuilder::on(root)
            .caption("SHAP Summary: Impact on Fraud Prediction", (FONT, 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(190)
            .build_cartesian_2d(-spread..spread, -0.5..(n as f64 - 0.5))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .x_desc("SHAP value (impact on model output)")
            .y_label_formatter(&|y| {
                let lane = y.round();
                if (y - lane).abs() > 1e-6 || lane < 0.0 {
                    return String::new();
                }
                n.checked_sub(lane as usize + 1)
                    .and_then(|rank| order.get(rank))
                    .and_then(|feature| FEATURE_NAMES.get(*feature))
                    .map(|name| name.to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        chart.draw_series(LineSeries::new(
            [(0.0, -0.5), (0.0, n as f64 - 0.5)],
            &BLACK.mix(0.4),
        ))?;

        let mut rng = StdRng::seed_from_u64(SPLIT_SEED);
        let mut dots = Vec::with_capacity(self.shap_values.len() * n);
        for (rank, &feature) in order.iter().enumerate() {
            let lane = (n - 1 - rank) as f64;
            let (lo, hi) = bounds[feature];
            for (shap_row, scaled_row) in self.shap_values.iter().zip(self.scaled_rows) {
                let (Some(shap), Some(value)) = (shap_row.get(feature), scaled_row.get(feature))
                else {
                    continue;
                };
                let t = if hi > lo { 2.0 * (value - lo) / (hi - lo) - 1.0 } else { 0.0 };
                let y = lane + rng.random_range(-JITTER..JITTER);
                dots.push(Circle::new((*shap, y), 3, diverging(t).mix(0.8).filled()));
            }
        }
        chart.draw_series(dots)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{render_svg, svg_text};

    #[test]
    fn lanes_follow_mean_absolute_impact() {
        let mut a = vec![0.0; FEATURE_NAMES.len()];
        let mut b = vec![0.0; FEATURE_NAMES.len()];
        a[2] = 0.3;
        b[2] = -0.3;
        a[8] = -0.1;
        b[6] = 0.05;
        let shap_values = vec![a, b];
        let summary = ShapSummary {
            shap_values: &shap_values,
            scaled_rows: &[],
        };

        let order = summary.lane_order();
        assert_eq!(&order[..3], &[2, 8, 6]);
        assert_eq!(order.len(), FEATURE_NAMES.len());
    }

    #[test]
    fn every_lane_is_labelled_with_its_feature() {
        let rows = vec![vec![0.1; FEATURE_NAMES.len()], vec![-0.2; FEATURE_NAMES.len()]];
        let scaled = vec![vec![0.0; FEATURE_NAMES.len()], vec![1.0; FEATURE_NAMES.len()]];
        let summary = ShapSummary {
            shap_values: &rows,
            scaled_rows: &scaled,
        };

        let svg = render_svg(&summary);
        let labels = svg_text(&svg);
        for name in FEATURE_NAMES {
            assert!(labels.iter().any(|l| l == name), "lane {name} not labelled");
        }
        assert!(svg.matches("<circle").count() >= 2 * FEATURE_NAMES.len());
    }
}
