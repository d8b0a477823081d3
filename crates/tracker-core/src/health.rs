//! Body-mass index and dashboard figures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::WeightRecord;

/// Compute BMI from weight (kg) and height (cm), rounded to two decimals.
///
/// Returns 0 when either input is not positive.
pub fn calculate_bmi(weight: f64, height: f64) -> f64 {
    if weight <= 0.0 || height <= 0.0 {
        return 0.0;
    }
    let meters = height / 100.0;
    let bmi = weight / (meters * meters);
    (bmi * 100.0).round() / 100.0
}

/// BMI band under the Taiwan Health Promotion Administration cut-offs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "過輕",
            BmiCategory::Healthy => "健康",
            BmiCategory::Overweight => "過重",
            BmiCategory::Obese => "肥胖",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a BMI value. Lower bounds are inclusive.
pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 24.0 {
        BmiCategory::Healthy
    } else if bmi < 27.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Mascot expression derived from the two most recent entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Excited,
    Sad,
}

/// Pick the mascot mood from records in descending date order.
pub fn mascot_mood(records: &[WeightRecord]) -> Mood {
    let [latest, previous, ..] = records else {
        return Mood::Happy;
    };
    let diff = latest.weight - previous.weight;
    if diff < 0.0 {
        Mood::Excited
    } else if diff > 0.5 {
        Mood::Sad
    } else {
        Mood::Happy
    }
}

/// Time window shown on the trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartRange {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "all")]
    All,
}

impl ChartRange {
    fn limit(&self) -> Option<usize> {
        match self {
            ChartRange::Week => Some(7),
            ChartRange::Month => Some(30),
            ChartRange::All => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown chart range: {0} (expected 7d, 30d or all)")]
pub struct ParseChartRangeError(String);

impl FromStr for ChartRange {
    type Err = ParseChartRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(ChartRange::Week),
            "30d" => Ok(ChartRange::Month),
            "all" => Ok(ChartRange::All),
            other => Err(ParseChartRangeError(other.to_string())),
        }
    }
}

/// Chart points for `range`, oldest first, from records in descending date order.
pub fn chart_window(records: &[WeightRecord], range: ChartRange) -> Vec<WeightRecord> {
    let take = range.limit().unwrap_or(records.len()).min(records.len());
    records[..take].iter().rev().cloned().collect()
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Latest recorded weight, if any.
    pub current_weight: Option<f64>,
    /// BMI rounded to one decimal, if weight and height are known.
    pub bmi: Option<f64>,
    pub category: Option<BmiCategory>,
    /// Absolute distance to the target weight, one decimal.
    pub distance_to_target: Option<f64>,
    pub mood: Mood,
}

/// Build the dashboard summary from records in descending date order.
pub fn summarize(records: &[WeightRecord], height: f64, target_weight: f64) -> DashboardSummary {
    let current_weight = records.first().map(|r| r.weight).filter(|w| *w > 0.0);

    let bmi = current_weight
        .map(|w| calculate_bmi(w, height))
        .filter(|bmi| *bmi > 0.0)
        .map(round_one);

    let distance_to_target = current_weight
        .filter(|_| target_weight > 0.0)
        .map(|w| round_one((w - target_weight).abs()));

    DashboardSummary {
        current_weight,
        bmi,
        category: bmi.map(bmi_category),
        distance_to_target,
        mood: mascot_mood(records),
    }
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
