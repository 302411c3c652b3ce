//! Display helpers for dashboard metrics: currency, percentages, grouped integers, trends.

use ratatui::style::Style;
use ratatui::text::Span;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Formats a dollar amount, compacting thousands, millions and billions to one decimal.
///
/// Amounts below a thousand are shown as whole dollars with grouping.
pub fn format_currency(value: f64) -> String {
    const SCALES: [(f64, &str); 3] = [(1e9, "B"), (1e6, "M"), (1e3, "K")];
    let magnitude = value.abs();
    for (scale, suffix) in SCALES {
        if magnitude >= scale {
            return format!("${:.1}{suffix}", value / scale);
        }
    }
    let rounded = value.round();
    let digits = group_digits(&format!("{:.0}", rounded.abs()));
    if rounded < 0.0 {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// Formats a value that is already a percentage, e.g. `18.2%`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

/// Formats a number with en-US thousands separators and at most three fraction digits.
pub fn format_integer(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.3}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let mut out = String::with_capacity(fixed.len() + whole.len() / 3 + 1);
    if value < 0.0 && (whole != "0" || !fraction.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_digits(whole));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// How a metric value is displayed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricFormat {
    Currency,
    Percentage,
    Integer,
    /// Two decimal places.
    Decimal,
    /// Whole days with a `d` suffix.
    Days,
}

/// Formats a metric value according to its format.
pub fn format_metric(value: f64, format: MetricFormat) -> String {
    match format {
        MetricFormat::Currency => format_currency(value),
        MetricFormat::Percentage => format_percent(value, 1),
        MetricFormat::Integer => format_integer(value),
        MetricFormat::Decimal => format!("{value:.2}"),
        // Halves round toward positive infinity.
        MetricFormat::Days => format!("{}d", (value + 0.5).floor()),
    }
}

/// Period-over-period change in percent; `None` when there is no previous value to compare.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    (previous != 0.0).then(|| (current - previous) / previous * 100.0)
}

/// Whether an increase of the metric is desirable.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TrendDirection {
    #[default]
    UpIsGood,
    DownIsGood,
}

/// A signed percentage change with its desirability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trend {
    pub value: f64,
    pub direction: TrendDirection,
}

impl Trend {
    pub const fn new(value: f64, direction: TrendDirection) -> Self {
        Self { value, direction }
    }

    /// Builds a trend from two period values; `None` when `previous` is zero.
    pub fn between(current: f64, previous: f64, direction: TrendDirection) -> Option<Self> {
        percent_change(current, previous).map(|value| Self::new(value, direction))
    }

    /// Zero counts as positive.
    pub fn is_positive(&self) -> bool {
        self.value >= 0.0
    }

    pub fn is_good(&self) -> bool {
        match self.direction {
            TrendDirection::UpIsGood => self.is_positive(),
            TrendDirection::DownIsGood => !self.is_positive(),
        }
    }

    /// Arrow and magnitude, e.g. `▲ 8.7%`.
    pub fn label(&self) -> String {
        let arrow = if self.is_positive() { '▲' } else { '▼' };
        format!("{arrow} {:.1}%", self.value.abs())
    }

    /// The label styled with `good` or `bad`.
    pub fn span(&self, good: Style, bad: Style) -> Span<'static> {
        Span::styled(self.label(), if self.is_good() { good } else { bad })
    }
}
