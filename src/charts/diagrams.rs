use super::{centered, Chart, DrawResult, ACCENT_COLOR, FONT, FRAUD_COLOR, LEGIT_COLOR};
use crate::analysis::heuristic::assess_risk;
use crate::analysis::indicators::{risk_meter, MeterColor, RiskMeter};
use crate::classifier::TrainedArtifacts;
use crate::evaluation::metrics::ClassificationMetrics;
use crate::models::application::{LoanApplication, SamplePreset, FEATURE_NAMES};
use crate::models::assessment::RiskAssessment;
use crate::models::prediction::{FraudClass, Prediction};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const SLATE: RGBColor = RGBColor(71, 85, 105);
const PURPLE: RGBColor = RGBColor(148, 103, 189);
const ORANGE: RGBColor = RGBColor(255, 127, 14);

fn left(size: f64) -> TextStyle<'static> {
    TextStyle::from((FONT, size).into_font()).pos(Pos::new(HPos::Left, VPos::Center))
}

fn panel<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    top_left: (i32, i32),
    bottom_right: (i32, i32),
    color: RGBColor,
) -> DrawResult<DB> {
    root.draw(&Rectangle::new([top_left, bottom_right], color.mix(0.12).filled()))?;
    root.draw(&Rectangle::new([top_left, bottom_right], color.stroke_width(2)))?;
    Ok(())
}

fn arrow<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, from: (i32, i32), to_x: i32) -> DrawResult<DB> {
    let (x, y) = from;
    root.draw(&PathElement::new(vec![(x, y), (to_x - 10, y)], BLACK.stroke_width(2)))?;
    root.draw(&Polygon::new(
        vec![(to_x, y), (to_x - 12, y - 7), (to_x - 12, y + 7)],
        BLACK.filled(),
    ))?;
    Ok(())
}

/// Five-stage pipeline with detail boxes for features, model quality and
/// the rule-based signals.
pub struct SystemArchitecture<'a> {
    pub algorithm: &'static str,
    pub rows: usize,
    pub metrics: &'a ClassificationMetrics,
    pub auc: f64,
}

impl SystemArchitecture<'_> {
    fn stages(&self) -> [(&'static str, String, RGBColor); 5] {
        let explainer = if self.algorithm == "Random Forest" {
            "Exact TreeSHAP"
        } else {
            "Linear SHAP"
        };
        [
            ("Data Ingestion", "Loan & land records".to_string(), LEGIT_COLOR),
            ("Preprocessing", "Standard scaling".to_string(), ORANGE),
            ("Classifier", self.algorithm.to_string(), ACCENT_COLOR),
            ("Explainability", explainer.to_string(), PURPLE),
            ("Risk Estimator", "Desktop form".to_string(), FRAUD_COLOR),
        ]
    }

    fn details(&self) -> [(&'static str, Vec<String>, RGBColor); 3] {
        let features: Vec<String> = FEATURE_NAMES.iter().map(|name| format!("• {name}")).collect();
        let performance = vec![
            format!("• Accuracy: {:.1}%", self.metrics.accuracy * 100.0),
            format!("• Precision: {:.1}%", self.metrics.precision * 100.0),
            format!("• Recall: {:.1}%", self.metrics.recall * 100.0),
            format!("• F1-Score: {:.1}%", self.metrics.f1 * 100.0),
            format!("• ROC AUC: {:.3}", self.auc),
            format!("• Held-out rows: {}", self.rows),
        ];
        let signals = vec![
            "• Validation: blocking + advisory".to_string(),
            "• Tiered heuristic score".to_string(),
            "• LTV and credit indicators".to_string(),
            "• Monthly payment and DTI".to_string(),
            "• Session history + CSV export".to_string(),
        ];
        [
            ("Input Features", features, LEGIT_COLOR),
            ("Model Performance", performance, ACCENT_COLOR),
            ("Decision Support", signals, FRAUD_COLOR),
        ]
    }
}

impl Chart for SystemArchitecture<'_> {
    const NAME: &'static str = "system_architecture";
    const SIZE: (u32, u32) = (1400, 820);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        root.draw(&Text::new(
            "Loan & Land Fraud Detection: System Architecture".to_string(),
            (700, 45),
            centered(30.0),
        ))?;

        let (width, gap, top, bottom) = (220, 50, 120, 250);
        for (i, (title, subtitle, color)) in self.stages().into_iter().enumerate() {
            let x = 40 + i as i32 * (width + gap);
            panel(root, (x, top), (x + width, bottom), color)?;
            root.draw(&Text::new(title.to_string(), (x + width / 2, top + 45), centered(21.0)))?;
            root.draw(&Text::new(subtitle, (x + width / 2, top + 85), centered(16.0).color(&SLATE)))?;
            if i < 4 {
                arrow(root, (x + width + 5, (top + bottom) / 2), x + width + gap - 5)?;
            }
        }

        let (width, gap, top, bottom) = (410, 45, 320, 780);
        for (i, (title, lines, color)) in self.details().into_iter().enumerate() {
            let x = 40 + i as i32 * (width + gap);
            panel(root, (x, top), (x + width, bottom), color)?;
            root.draw(&Text::new(title.to_string(), (x + width / 2, top + 35), centered(22.0)))?;
            for (row, line) in lines.into_iter().enumerate() {
                root.draw(&Text::new(line, (x + 25, top + 80 + row as i32 * 36), left(17.0)))?;
            }
        }

        Ok(())
    }
}

/// Mock-up of the estimator window filled in with the high-risk sample and
/// the verdict the loaded classifier gives it.
pub struct WebInterface {
    pub application: LoanApplication,
    pub prediction: Prediction,
    pub assessment: RiskAssessment,
    pub meter: RiskMeter,
}

impl WebInterface {
    pub fn new(artifacts: &TrainedArtifacts) -> Self {
        let application = SamplePreset::Risky.application();
        Self {
            prediction: artifacts.predict(&application),
            assessment: assess_risk(&application),
            meter: risk_meter(&application),
            application,
        }
    }

    fn form_rows(&self) -> Vec<(&'static str, String)> {
        let a = &self.application;
        vec![
            ("Loan amount", format!("{:.0}", a.loan_amount)),
            ("Tenure (months)", a.loan_tenure_months.to_string()),
            ("Loan-to-value (%)", format!("{:.1}", a.loan_to_value_ratio)),
            ("Valuation difference (%)", format!("{:.1}", a.valuation_difference_pct)),
            ("Previous mortgages", a.num_prev_mortgages.to_string()),
            ("Ownership match score", format!("{:.2}", a.ownership_match_score)),
            ("OCR confidence", format!("{:.2}", a.ocr_confidence)),
            ("Encumbrance", if a.encumbrance_flag { "Yes" } else { "No" }.to_string()),
            ("Credit score", a.credit_score.to_string()),
            ("Annual income", format!("{:.0}", a.income)),
        ]
    }
}

fn meter_rgb(color: MeterColor) -> RGBColor {
    match color {
        MeterColor::Green => ACCENT_COLOR,
        MeterColor::Yellow => RGBColor(234, 179, 8),
        MeterColor::Amber => ORANGE,
        MeterColor::Red => FRAUD_COLOR,
    }
}

impl Chart for WebInterface {
    const NAME: &'static str = "web_interface";
    const SIZE: (u32, u32) = (1200, 860);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&RGBColor(241, 245, 249))?;

        // Window chrome.
        root.draw(&Rectangle::new([(0, 0), (1200, 44)], SLATE.filled()))?;
        for (i, color) in [FRAUD_COLOR, RGBColor(234, 179, 8), ACCENT_COLOR].into_iter().enumerate() {
            root.draw(&Circle::new((24 + i as i32 * 22, 22), 7, color.filled()))?;
        }
        root.draw(&Text::new(
            "FraudLens: Loan & Land Fraud Risk Estimator".to_string(),
            (600, 22),
            centered(18.0).color(&WHITE),
        ))?;

        // Application form.
        panel(root, (30, 70), (580, 830), LEGIT_COLOR)?;
        root.draw(&Text::new("Application Details".to_string(), (305, 105), centered(22.0)))?;
        for (row, (label, value)) in self.form_rows().into_iter().enumerate() {
            let y = 160 + row as i32 * 58;
            root.draw(&Text::new(label.to_string(), (55, y), left(16.0)))?;
            root.draw(&Rectangle::new([(330, y - 18), (555, y + 18)], WHITE.filled()))?;
            root.draw(&Rectangle::new([(330, y - 18), (555, y + 18)], SLATE.mix(0.5).stroke_width(1)))?;
            root.draw(&Text::new(value, (342, y), left(16.0)))?;
        }
        root.draw(&Rectangle::new([(55, 760), (555, 805)], LEGIT_COLOR.filled()))?;
        root.draw(&Text::new(
            "Analyze Application".to_string(),
            (305, 782),
            centered(18.0).color(&WHITE),
        ))?;

        // Verdict card.
        let verdict_color = match self.prediction.class {
            FraudClass::Fraud => FRAUD_COLOR,
            FraudClass::Legitimate => ACCENT_COLOR,
        };
        panel(root, (610, 70), (1170, 400), verdict_color)?;
        root.draw(&Text::new(
            self.prediction.headline().to_string(),
            (890, 115),
            centered(26.0).color(&verdict_color),
        ))?;
        let probability_label = match self.prediction.class {
            FraudClass::Fraud => "Fraud probability",
            FraudClass::Legitimate => "Safety probability",
        };
        root.draw(&Text::new(
            format!("{probability_label}: {:.1}%", self.prediction.headline_probability() * 100.0),
            (890, 165),
            centered(20.0),
        ))?;
        root.draw(&Text::new(
            format!(
                "Heuristic score: {} / 100 ({:?})",
                self.assessment.display_score(),
                self.assessment.profile()
            ),
            (890, 205),
            centered(17.0).color(&SLATE),
        ))?;

        // Risk meter.
        root.draw(&Text::new("Risk meter".to_string(), (640, 255), left(16.0)))?;
        root.draw(&Rectangle::new([(640, 275), (1140, 300)], WHITE.filled()))?;
        let fill = 640 + (self.meter.level.clamp(0.0, 100.0) * 5.0).round() as i32;
        root.draw(&Rectangle::new([(640, 275), (fill, 300)], meter_rgb(self.meter.color).filled()))?;
        root.draw(&Rectangle::new([(640, 275), (1140, 300)], SLATE.stroke_width(1)))?;
        root.draw(&Text::new(
            format!("{:.0}%", self.meter.level),
            (1140, 320),
            TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Right, VPos::Top)),
        ))?;

        // Recommendation, wrapped at sentence boundaries.
        for (row, sentence) in self
            .prediction
            .recommendation()
            .split_inclusive(". ")
            .enumerate()
        {
            root.draw(&Text::new(
                sentence.trim().to_string(),
                (640, 355 + row as i32 * 24),
                left(15.0),
            ))?;
        }

        // Triggered factors.
        panel(root, (610, 430), (1170, 830), ORANGE)?;
        root.draw(&Text::new("Risk Factors".to_string(), (890, 465), centered(22.0)))?;
        let labels = self.assessment.labels();
        if labels.is_empty() {
            root.draw(&Text::new("No heuristic risk factors".to_string(), (640, 515), left(16.0)))?;
        }
        for (row, label) in labels.into_iter().take(9).enumerate() {
            root.draw(&Text::new(format!("• {label}"), (640, 515 + row as i32 * 34), left(16.0)))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_mirrors_every_feature() {
        let mockup = WebInterface {
            application: SamplePreset::Risky.application(),
            prediction: Prediction {
                class: FraudClass::Fraud,
                fraud_probability: 0.9,
            },
            assessment: RiskAssessment {
                score: 0,
                factors: Vec::new(),
            },
            meter: risk_meter(&SamplePreset::Risky.application()),
        };
        assert_eq!(mockup.form_rows().len(), FEATURE_NAMES.len());
    }

    #[test]
    fn explainer_tracks_algorithm() {
        let metrics = ClassificationMetrics {
            accuracy: 0.9,
            precision: 0.9,
            recall: 0.9,
            f1: 0.9,
        };
        let diagram = SystemArchitecture {
            algorithm: "Logistic Regression",
            rows: 10,
            metrics: &metrics,
            auc: 0.9,
        };
        assert_eq!(diagram.stages()[3].1, "Linear SHAP");
        assert_eq!(diagram.details()[0].1.len(), FEATURE_NAMES.len());
    }
}
