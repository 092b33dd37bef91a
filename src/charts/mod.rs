//! Manuscript figures rendered from an [`Evaluation`].
//!
//! Every chart draws onto a generic plotters backend so the same code emits
//! SVG and, with the `raster` feature, PNG.

pub mod diagrams;
pub mod features;
pub mod performance;
pub mod shap;

use crate::classifier::TrainedArtifacts;
use crate::errors::{FraudLensError, Result};
use crate::evaluation::dataset::Dataset;
use crate::evaluation::{evaluate, Evaluation};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

/// Output file stems, in generation order.
pub const CHART_NAMES: [&str; 9] = [
    features::FeatureImportance::NAME,
    features::CorrelationHeatmap::NAME,
    shap::ShapSummary::NAME,
    performance::ConfusionMatrixChart::NAME,
    performance::RocCurveChart::NAME,
    diagrams::SystemArchitecture::NAME,
    diagrams::WebInterface::NAME,
    performance::PerformanceMetrics::NAME,
    features::FeatureDistributions::NAME,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ChartFormat {
    #[default]
    Svg,
    #[cfg(feature = "raster")]
    Png,
}

impl ChartFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Svg => "svg",
            #[cfg(feature = "raster")]
            ChartFormat::Png => "png",
        }
    }
}

pub(crate) type DrawResult<DB> =
    std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

pub(crate) trait Chart {
    const NAME: &'static str;
    const SIZE: (u32, u32) = (1000, 700);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB>;
}

pub(crate) fn render<C: Chart>(chart: &C, out_dir: &Path, format: ChartFormat) -> Result<PathBuf> {
    let path = out_dir.join(format!("{}.{}", C::NAME, format.extension()));

    match format {
        ChartFormat::Svg => {
            let root = SVGBackend::new(&path, C::SIZE).into_drawing_area();
            chart.draw(&root).map_err(|e| FraudLensError::chart(C::NAME, e))?;
            root.present().map_err(|e| FraudLensError::chart(C::NAME, e))?;
        }
        #[cfg(feature = "raster")]
        ChartFormat::Png => {
            let root = BitMapBackend::new(&path, C::SIZE).into_drawing_area();
            chart.draw(&root).map_err(|e| FraudLensError::chart(C::NAME, e))?;
            root.present().map_err(|e| FraudLensError::chart(C::NAME, e))?;
        }
    }

    log::info!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
pub(crate) fn render_svg<C: Chart>(chart: &C) -> String {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, C::SIZE).into_drawing_area();
        chart.draw(&root).expect("draw chart");
        root.present().expect("present chart");
    }
    svg
}

/// Trimmed contents of every `<text>` element.
#[cfg(test)]
pub(crate) fn svg_text(svg: &str) -> Vec<String> {
    svg.split("<text")
        .skip(1)
        .filter_map(|element| {
            let body = &element[element.find('>')? + 1..];
            Some(body[..body.find("</text>")?].trim().to_string())
        })
        .collect()
}

/// Inputs for one chart-generation run.
#[derive(Debug, Clone)]
pub struct ChartJob {
    pub dataset: PathBuf,
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub output_dir: PathBuf,
    pub format: ChartFormat,
    pub test_fraction: f64,
    pub seed: u64,
}

/// Loads the dataset and artifacts, evaluates the held-out split and writes
/// every figure.
pub fn generate(job: &ChartJob) -> Result<Vec<PathBuf>> {
    let dataset = Dataset::load(&job.dataset)?;
    let artifacts = TrainedArtifacts::load(&job.model, &job.scaler)?;
    let evaluation = evaluate(&dataset, &artifacts, job.test_fraction, job.seed);
    render_all(&evaluation, &artifacts, &job.output_dir, job.format)
}

/// Renders all nine figures into `out_dir`, overwriting earlier runs.
pub fn render_all(
    evaluation: &Evaluation,
    artifacts: &TrainedArtifacts,
    out_dir: &Path,
    format: ChartFormat,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).map_err(|e| FraudLensError::io(out_dir, e))?;

    let mut written = Vec::with_capacity(CHART_NAMES.len());
    written.push(render(
        &features::FeatureImportance {
            importances: &evaluation.importances,
        },
        out_dir,
        format,
    )?);
    written.push(render(
        &features::CorrelationHeatmap {
            correlations: &evaluation.correlations,
        },
        out_dir,
        format,
    )?);
    written.push(render(
        &shap::ShapSummary {
            shap_values: &evaluation.shap_values,
            scaled_rows: &evaluation.scaled_test,
        },
        out_dir,
        format,
    )?);
    written.push(render(
        &performance::ConfusionMatrixChart {
            confusion: &evaluation.confusion,
        },
        out_dir,
        format,
    )?);
    written.push(render(
        &performance::RocCurveChart {
            roc: &evaluation.roc,
            auc: evaluation.roc_auc,
        },
        out_dir,
        format,
    )?);
    written.push(render(
        &diagrams::SystemArchitecture {
            algorithm: artifacts.algorithm(),
            rows: evaluation.test.len(),
            metrics: &evaluation.metrics,
            auc: evaluation.roc_auc,
        },
        out_dir,
        format,
    )?);
    written.push(render(&diagrams::WebInterface::new(artifacts), out_dir, format)?);
    written.push(render(
        &performance::PerformanceMetrics {
            metrics: &evaluation.metrics,
        },
        out_dir,
        format,
    )?);
    written.push(render(
        &features::FeatureDistributions {
            dataset: &evaluation.full,
        },
        out_dir,
        format,
    )?);

    Ok(written)
}

pub(crate) const FONT: &str = "sans-serif";
pub(crate) const FRAUD_COLOR: RGBColor = RGBColor(214, 39, 40);
pub(crate) const LEGIT_COLOR: RGBColor = RGBColor(31, 119, 180);
pub(crate) const ACCENT_COLOR: RGBColor = RGBColor(44, 160, 44);

/// Text centred on its anchor point.
pub(crate) fn centered(size: f64) -> TextStyle<'static> {
    TextStyle::from((FONT, size).into_font()).pos(Pos::new(HPos::Center, VPos::Center))
}

/// Linear blue to white to red ramp for `t` in [-1, 1].
pub(crate) fn diverging(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(-1.0, 1.0) } else { 0.0 };
    let blend = |from: u8, to: u8, w: f64| (f64::from(from) + (f64::from(to) - f64::from(from)) * w).round() as u8;
    if t < 0.0 {
        let w = -t;
        RGBColor(blend(255, 59, w), blend(255, 76, w), blend(255, 192, w))
    } else {
        RGBColor(blend(255, 180, t), blend(255, 4, t), blend(255, 38, t))
    }
}
