//! Factor calculator
//!
//! Turns five slider values into a score with a fixed weighted sum. This is
//! a demo formula for driving the visualizer, not a credit model.

use serde::{Deserialize, Serialize};

use crate::city::Score;

/// One calculator input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    PaymentHistory,
    Utilization,
    HistoryLength,
    CreditMix,
    NewCredit,
}

impl Factor {
    pub const ALL: [Factor; 5] = [
        Factor::PaymentHistory,
        Factor::Utilization,
        Factor::HistoryLength,
        Factor::CreditMix,
        Factor::NewCredit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Factor::PaymentHistory => "Payment History (35%)",
            Factor::Utilization => "Credit Utilization (30%)",
            Factor::HistoryLength => "Credit History Length (15%)",
            Factor::CreditMix => "Credit Mix (10%)",
            Factor::NewCredit => "New Credit (10%)",
        }
    }

    /// Slider maximum; every factor starts at zero
    pub fn max(self) -> u8 {
        match self {
            Factor::HistoryLength => 30,
            _ => 100,
        }
    }

    /// Unit suffix for display
    pub fn unit(self) -> &'static str {
        match self {
            Factor::HistoryLength => " yrs",
            _ => "%",
        }
    }
}

/// Slider values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditFactors {
    pub payment_history: u8,
    pub utilization: u8,
    pub history_years: u8,
    pub credit_mix: u8,
    pub new_credit: u8,
}

impl Default for CreditFactors {
    fn default() -> Self {
        Self {
            payment_history: 50,
            utilization: 30,
            history_years: 15,
            credit_mix: 10,
            new_credit: 10,
        }
    }
}

impl CreditFactors {
    pub fn get(&self, factor: Factor) -> u8 {
        match factor {
            Factor::PaymentHistory => self.payment_history,
            Factor::Utilization => self.utilization,
            Factor::HistoryLength => self.history_years,
            Factor::CreditMix => self.credit_mix,
            Factor::NewCredit => self.new_credit,
        }
    }

    /// Set a factor, clamped to its slider range
    pub fn set(&mut self, factor: Factor, value: i32) {
        let value = value.clamp(0, factor.max() as i32) as u8;
        match factor {
            Factor::PaymentHistory => self.payment_history = value,
            Factor::Utilization => self.utilization = value,
            Factor::HistoryLength => self.history_years = value,
            Factor::CreditMix => self.credit_mix = value,
            Factor::NewCredit => self.new_credit = value,
        }
    }

    pub fn adjust(&mut self, factor: Factor, delta: i32) {
        self.set(factor, self.get(factor) as i32 + delta);
    }

    /// Weighted sum, floored, then clamped into the score range
    pub fn score(&self) -> Score {
        let raw = self.payment_history as f32 * 3.5
            + (100.0 - self.utilization.min(100) as f32) * 3.0
            + self.history_years as f32 * 1.5
            + self.credit_mix as f32
            + self.new_credit as f32;
        Score::new(raw.floor() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factors() {
        assert_eq!(CreditFactors::default().score().value(), 427);
    }

    #[test]
    fn test_best_case_clamps_to_850() {
        let best = CreditFactors {
            payment_history: 100,
            utilization: 0,
            history_years: 30,
            credit_mix: 100,
            new_credit: 100,
        };
        // 350 + 300 + 45 + 100 + 100 = 895
        assert_eq!(best.score().value(), 850);
    }

    #[test]
    fn test_worst_case_clamps_to_300() {
        let worst = CreditFactors {
            payment_history: 0,
            utilization: 100,
            history_years: 0,
            credit_mix: 0,
            new_credit: 0,
        };
        assert_eq!(worst.score().value(), 300);
    }

    #[test]
    fn test_fractional_sum_floors() {
        let factors = CreditFactors {
            payment_history: 81,
            utilization: 20,
            history_years: 7,
            credit_mix: 0,
            new_credit: 0,
        };
        // 283.5 + 240 + 10.5 = 534
        assert_eq!(factors.score().value(), 534);

        let factors = CreditFactors {
            history_years: 8,
            ..factors
        };
        // 283.5 + 240 + 12 = 535.5
        assert_eq!(factors.score().value(), 535);
    }

    #[test]
    fn test_adjust_respects_slider_range() {
        let mut factors = CreditFactors::default();
        factors.adjust(Factor::HistoryLength, 100);
        assert_eq!(factors.history_years, 30);
        factors.adjust(Factor::Utilization, -500);
        assert_eq!(factors.utilization, 0);
        factors.set(Factor::PaymentHistory, 75);
        assert_eq!(factors.get(Factor::PaymentHistory), 75);
    }
}
