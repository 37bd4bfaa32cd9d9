// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spending status for a monthly budget.
//!
//! `classify` is pure and total: callers validate the budget amount before
//! reaching it (see [`crate::validation::parse_budget_amount`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const WARNING_PCT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
const DANGER_PCT: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    #[serde(alias = "ok")]
    Safe,
    Warning,
    Danger,
    #[serde(alias = "empty")]
    NotSet,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::Safe => "safe",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Danger => "danger",
            BudgetStatus::NotSet => "not_set",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::Safe => "On track",
            BudgetStatus::Warning => "Caution",
            BudgetStatus::Danger => "Over budget",
            BudgetStatus::NotSet => "No budget set",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            BudgetStatus::Safe => "Great job staying within budget!",
            BudgetStatus::Warning => "Approaching the budget limit.",
            BudgetStatus::Danger => "You have exceeded the budget.",
            BudgetStatus::NotSet => "Set a budget to start tracking.",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub status: BudgetStatus,
    pub percentage: Decimal,
    pub remaining: Decimal,
}

impl Classification {
    /// How far spending went past the budget, when it did.
    pub fn overspent(&self) -> Option<Decimal> {
        if self.status == BudgetStatus::Danger && self.remaining.is_sign_negative() {
            Some(-self.remaining)
        } else {
            None
        }
    }

    /// Percentage clamped to 0..=100 for progress bars.
    pub fn display_percentage(&self) -> Decimal {
        self.percentage.clamp(Decimal::ZERO, DANGER_PCT)
    }
}

pub fn classify(amount: Option<Decimal>, spent: Decimal) -> Classification {
    let Some(amount) = amount else {
        return Classification {
            status: BudgetStatus::NotSet,
            percentage: Decimal::ZERO,
            remaining: Decimal::ZERO,
        };
    };

    let percentage = if amount > Decimal::ZERO {
        // checked_ ops keep absurd inputs from panicking on overflow
        spent
            .checked_div(amount)
            .and_then(|ratio| ratio.checked_mul(DANGER_PCT))
            .unwrap_or(Decimal::MAX)
    } else if spent > Decimal::ZERO {
        Decimal::MAX
    } else {
        Decimal::ZERO
    };

    let status = if percentage < WARNING_PCT {
        BudgetStatus::Safe
    } else if percentage < DANGER_PCT {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Danger
    };

    Classification {
        status,
        percentage,
        remaining: amount - spent,
    }
}
