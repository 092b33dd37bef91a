use super::{centered, Chart, DrawResult, ACCENT_COLOR, FONT, FRAUD_COLOR, LEGIT_COLOR};
use crate::evaluation::metrics::{ClassificationMetrics, ConfusionMatrix, RocCurve};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub const TARGET_SCORE: f64 = 90.0;
const CLASS_LABELS: [&str; 2] = ["Legitimate", "Fraud"];

pub struct ConfusionMatrixChart<'a> {
    pub confusion: &'a ConfusionMatrix,
}

impl Chart for ConfusionMatrixChart<'_> {
    const NAME: &'static str = "confusion_matrix";
    const SIZE: (u32, u32) = (800, 700);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;

        let grid = self.confusion.as_grid();
        let peak = grid.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;
        let accuracy = ClassificationMetrics::from_confusion(self.confusion).accuracy;
        let caption = format!("Confusion Matrix (accuracy {:.1}%)", accuracy * 100.0);

        let mut chart = ChartBuilder::on(root)
            .caption(caption, (FONT, 24))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(110)
            .build_cartesian_2d((0..1usize).into_segmented(), (0..1usize).into_segmented())?;

        // Actual classes run top to bottom.
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Predicted")
            .y_desc("Actual")
            .x_labels(2)
            .y_labels(2)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(col) => CLASS_LABELS.get(*col).copied().unwrap_or("").to_string(),
                _ => String::new(),
            })
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(row) => 1usize
                    .checked_sub(*row)
                    .and_then(|actual| CLASS_LABELS.get(actual))
                    .copied()
                    .unwrap_or("")
                    .to_string(),
                _ => String::new(),
            })
            .draw()?;

        let cells: Vec<(usize, usize, usize)> = (0..2)
            .flat_map(|actual| (0..2).map(move |predicted| (actual, predicted)))
            .map(|(actual, predicted)| (actual, predicted, grid[actual][predicted]))
            .collect();

        chart.draw_series(cells.iter().map(|&(actual, predicted, count)| {
            let y = 1 - actual;
            let shade = count as f64 / peak;
            Rectangle::new(
                [
                    (SegmentValue::Exact(predicted), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(predicted + 1), SegmentValue::Exact(y + 1)),
                ],
                LEGIT_COLOR.mix(0.1 + 0.85 * shade).filled(),
            )
        }))?;

        chart.draw_series(cells.iter().map(|&(actual, predicted, count)| {
            let dark = count as f64 / peak > 0.5;
            Text::new(
                count.to_string(),
                (SegmentValue::CenterOf(predicted), SegmentValue::CenterOf(1 - actual)),
                centered(32.0).color(if dark { &WHITE } else { &BLACK }),
            )
        }))?;

        Ok(())
    }
}

pub struct RocCurveChart<'a> {
    pub roc: &'a RocCurve,
    pub auc: f64,
}

impl Chart for RocCurveChart<'_> {
    const NAME: &'static str = "roc_curve";
    const SIZE: (u32, u32) = (800, 700);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(root)
            .caption("Receiver Operating Characteristic", (FONT, 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..1.0, 0.0..1.02)?;

        chart
            .configure_mesh()
            .x_desc("False Positive Rate")
            .y_desc("True Positive Rate")
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                self.roc.fpr.iter().copied().zip(self.roc.tpr.iter().copied()),
                FRAUD_COLOR.stroke_width(3),
            ))?
            .label(format!("ROC curve (AUC = {:.3})", self.auc))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FRAUD_COLOR.stroke_width(3)));

        chart
            .draw_series(LineSeries::new([(0.0, 0.0), (1.0, 1.0)], BLACK.mix(0.5).stroke_width(1)))?
            .label("Chance")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.mix(0.5)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, 16))
            .draw()?;

        Ok(())
    }
}

/// Headline scores as percentages against the deployment target.
pub struct PerformanceMetrics<'a> {
    pub metrics: &'a ClassificationMetrics,
}

impl PerformanceMetrics<'_> {
    pub fn scores(&self) -> [(&'static str, f64); 4] {
        [
            ("Accuracy", self.metrics.accuracy * 100.0),
            ("Precision", self.metrics.precision * 100.0),
            ("Recall", self.metrics.recall * 100.0),
            ("F1-Score", self.metrics.f1 * 100.0),
        ]
    }
}

impl Chart for PerformanceMetrics<'_> {
    const NAME: &'static str = "performance_metrics";
    const SIZE: (u32, u32) = (1000, 600);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;

        let scores = self.scores();
        let n = scores.len();

        let mut chart = ChartBuilder::on(root)
            .caption("Model Performance Metrics", (FONT, 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(120)
            .build_cartesian_2d(0.0..105.0, (0..n - 1).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Score (%)")
            .y_labels(n)
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(row) => n
                    .checked_sub(row + 1)
                    .and_then(|rank| scores.get(rank))
                    .map(|(name, _)| name.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(scores.iter().enumerate().map(|(rank, (_, value))| {
            let row = n - 1 - rank;
            let color = if *value >= TARGET_SCORE { ACCENT_COLOR } else { LEGIT_COLOR };
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(row)),
                    (*value, SegmentValue::Exact(row + 1)),
                ],
                color.mix(0.85).filled(),
            );
            bar.set_margin(10, 10, 0, 0);
            bar
        }))?;

        let value_style =
            TextStyle::from((FONT, 16).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
        chart.draw_series(scores.iter().enumerate().map(|(rank, (_, value))| {
            Text::new(
                format!(" {value:.1}%"),
                (*value, SegmentValue::CenterOf(n - 1 - rank)),
                value_style.clone(),
            )
        }))?;

        chart
            .draw_series(LineSeries::new(
                [
                    (TARGET_SCORE, SegmentValue::Exact(0)),
                    (TARGET_SCORE, SegmentValue::Exact(n)),
                ],
                FRAUD_COLOR.stroke_width(2),
            ))?
            .label(format!("Target ({TARGET_SCORE:.0}%)"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FRAUD_COLOR.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        Ok(())
    }
}
