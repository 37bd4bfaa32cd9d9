// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget_status::{BudgetStatus, classify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Utilities,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 4] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Utilities,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Unknown category '{}', expected one of Food, Transport, Utilities, Other",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterCredentials {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub category: ExpenseCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateExpense {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: ExpenseCategory,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
}

/// Partial update; only the fields that are set go over the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateExpense {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    #[serde(skip_serializing_if = "Option::is_none", with = "calendar_date_option")]
    pub date: Option<NaiveDate>,
}

impl UpdateExpense {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.amount.is_none() && self.category.is_none() && self.date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategorySummary {
    pub category: ExpenseCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub month: u32,
    pub year: i32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub budget: Option<Budget>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
    pub month: u32,
    pub year: i32,
    pub status: BudgetStatus,
    pub has_budget: bool,
}

impl BudgetSummary {
    /// Re-derives status, percentage and remaining from the raw totals so the
    /// canonical thresholds apply no matter what the server computed.
    pub fn normalized(mut self) -> Self {
        let amount = self.budget.as_ref().map(|b| b.amount);
        let c = classify(amount, self.total_expenses);
        self.status = c.status;
        self.percentage = c.percentage;
        self.remaining = c.remaining;
        self.has_budget = amount.is_some();
        self
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.budget.as_ref().map(|b| b.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsertBudget {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Wire envelope wrapped around every successful response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned alongside 4xx/5xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, emits `YYYY-MM-DD`.
pub(crate) mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(s: &str) -> Option<NaiveDate> {
        let day = s.split('T').next().unwrap_or(s);
        NaiveDate::parse_from_str(day.trim(), FORMAT).ok()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw)))
    }
}

pub(crate) mod calendar_date_option {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => super::calendar_date::serialize(d, s),
            None => s.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn expense_accepts_timestamp_dates() {
        let raw = r#"{
            "id": "e1", "title": "Lunch", "category": "Food", "amount": 12.5,
            "date": "2024-03-05T00:00:00.000Z", "createdBy": "u1",
            "createdAt": "2024-03-05T10:00:00Z", "updatedAt": "2024-03-05T10:00:00Z"
        }"#;
        let e: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(e.amount, dec("12.5"));
        assert_eq!(e.category, ExpenseCategory::Food);
    }

    #[test]
    fn update_only_sends_set_fields() {
        let patch = UpdateExpense {
            amount: Some(dec("20")),
            ..Default::default()
        };
        let v = serde_json::to_value(&patch).unwrap();
        assert_eq!(v, serde_json::json!({ "amount": 20.0 }));
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!("transport".parse::<ExpenseCategory>().unwrap(), ExpenseCategory::Transport);
        assert!("Rent".parse::<ExpenseCategory>().is_err());
    }

    #[test]
    fn summary_normalization_overrides_server_status() {
        let raw = r#"{
            "budget": {"id": "b1", "amount": 100, "month": 3, "year": 2024, "createdBy": "u1",
                       "createdAt": "2024-03-01T00:00:00Z", "updatedAt": "2024-03-01T00:00:00Z"},
            "totalExpenses": 85, "remaining": 15, "percentage": 85,
            "month": 3, "year": 2024, "status": "ok", "hasBudget": true
        }"#;
        let s: BudgetSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(s.status, BudgetStatus::Safe);
        let s = s.normalized();
        assert_eq!(s.status, BudgetStatus::Warning);
        assert_eq!(s.remaining, dec("15"));
    }
}
