// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User-facing filter selections to canonical request params and cache keys.

use serde::Serialize;

use crate::cache::QueryKey;

pub const EXPENSES: &str = "expenses";
pub const EXPENSE_STATS: &str = "expenseStats";
pub const BUDGET_SUMMARY: &str = "budgetSummary";
pub const AUTH: &str = "auth";

const ALL: &str = "all";
const CURRENT: &str = "current";

/// Raw selections exactly as the user typed them.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilterInput {
    pub category: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ExpenseQuery {
    pub category: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl ExpenseFilterInput {
    pub fn normalize(&self) -> ExpenseQuery {
        ExpenseQuery {
            category: non_empty(self.category.as_deref()).map(str::to_string),
            month: parse_month(self.month.as_deref()),
            year: parse_year(self.year.as_deref()),
        }
    }
}

impl ExpenseQuery {
    /// Outgoing query parameters; absent filters are omitted entirely.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(c) = &self.category {
            out.push(("category", c.clone()));
        }
        if let Some(m) = self.month {
            out.push(("month", m.to_string()));
        }
        if let Some(y) = self.year {
            out.push(("year", y.to_string()));
        }
        out
    }

    pub fn key(&self) -> QueryKey {
        QueryKey::new(EXPENSES)
            .with(self.category.as_deref().unwrap_or(ALL))
            .with(segment(self.month, ALL))
            .with(segment(self.year, ALL))
    }
}

/// Month/year of a budget summary; `None` means "server's current period".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BudgetPeriod {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl BudgetPeriod {
    pub fn new(month: u32, year: i32) -> Self {
        BudgetPeriod {
            month: valid_month(month),
            year: Some(year),
        }
    }

    pub fn from_input(month: Option<&str>, year: Option<&str>) -> Self {
        BudgetPeriod {
            month: parse_month(month),
            year: parse_year(year),
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(m) = self.month {
            out.push(("month", m.to_string()));
        }
        if let Some(y) = self.year {
            out.push(("year", y.to_string()));
        }
        out
    }

    pub fn key(&self) -> QueryKey {
        QueryKey::new(BUDGET_SUMMARY)
            .with(segment(self.month, CURRENT))
            .with(segment(self.year, CURRENT))
    }
}

pub fn expense_key(id: &str) -> QueryKey {
    QueryKey::new(EXPENSES).with("id").with(id)
}

pub fn expense_stats_key() -> QueryKey {
    QueryKey::new(EXPENSE_STATS)
}

pub fn me_key() -> QueryKey {
    QueryKey::new(AUTH).with("me")
}

fn segment<T: ToString>(v: Option<T>, absent: &str) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| absent.to_string())
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(ALL))
}

fn parse_month(s: Option<&str>) -> Option<u32> {
    non_empty(s).and_then(|s| s.parse::<u32>().ok()).and_then(valid_month)
}

fn parse_year(s: Option<&str>) -> Option<i32> {
    non_empty(s).and_then(|s| s.parse::<i32>().ok())
}

fn valid_month(m: u32) -> Option<u32> {
    (1..=12).contains(&m).then_some(m)
}
