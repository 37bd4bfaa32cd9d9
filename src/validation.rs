// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client-side form checks. Failing input never reaches the API.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{FieldErrors, ValidationError};
use crate::models::{
    CreateExpense, ExpenseCategory, LoginCredentials, RegisterCredentials, UpdateExpense,
    UpsertBudget,
};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

pub fn is_valid_email(s: &str) -> bool {
    EMAIL.is_match(s)
}

/// A non-negative decimal amount, or `None`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|d| !d.is_sign_negative() || d.is_zero())
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.add("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.add("email", "Please enter a valid email");
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
}

pub fn login(email: &str, password: &str) -> Result<LoginCredentials, ValidationError> {
    let email = email.trim();
    let mut errors = FieldErrors::new();
    check_email(&mut errors, email);
    check_password(&mut errors, password);
    errors.into_result()?;
    Ok(LoginCredentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

pub fn register(
    name: &str,
    email: &str,
    password: &str,
) -> Result<RegisterCredentials, ValidationError> {
    let email = email.trim();
    let mut errors = FieldErrors::new();
    if name.trim().is_empty() {
        errors.add("name", "Name is required");
    }
    check_email(&mut errors, email);
    check_password(&mut errors, password);
    errors.into_result()?;
    Ok(RegisterCredentials {
        email: email.to_string(),
        password: password.to_string(),
        name: name.trim().to_string(),
    })
}

/// Raw expense form fields.
#[derive(Debug, Clone, Default)]
pub struct ExpenseForm {
    pub title: String,
    pub amount: String,
    pub category: String,
    /// `None` means today.
    pub date: Option<String>,
}

pub fn expense(form: &ExpenseForm, today: NaiveDate) -> Result<CreateExpense, ValidationError> {
    let mut errors = FieldErrors::new();
    let title = form.title.trim();
    if title.is_empty() {
        errors.add("title", "Title is required");
    }
    let amount = parse_amount(&form.amount);
    if amount.is_none() {
        errors.add("amount", "Please enter a valid amount");
    }
    let category = match form.category.parse::<ExpenseCategory>() {
        Ok(c) => Some(c),
        Err(msg) => {
            errors.add("category", msg);
            None
        }
    };
    let date = match form.date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => Some(today),
        Some(raw) => {
            let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
            if parsed.is_none() {
                errors.add("date", "Please enter a valid date (YYYY-MM-DD)");
            }
            parsed
        }
    };
    match (amount, category, date) {
        (Some(amount), Some(category), Some(date)) if errors.is_empty() => Ok(CreateExpense {
            title: title.to_string(),
            amount,
            category,
            date,
        }),
        _ => Err(ValidationError(errors)),
    }
}

/// Partial expense edit; only the supplied fields are checked and sent.
#[derive(Debug, Clone, Default)]
pub struct ExpensePatchForm {
    pub title: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

pub fn expense_patch(form: &ExpensePatchForm) -> Result<UpdateExpense, ValidationError> {
    let mut errors = FieldErrors::new();
    let mut patch = UpdateExpense::default();
    if let Some(title) = &form.title {
        if title.trim().is_empty() {
            errors.add("title", "Title is required");
        } else {
            patch.title = Some(title.trim().to_string());
        }
    }
    if let Some(raw) = &form.amount {
        match parse_amount(raw) {
            Some(a) => patch.amount = Some(a),
            None => errors.add("amount", "Please enter a valid amount"),
        }
    }
    if let Some(raw) = &form.category {
        match raw.parse::<ExpenseCategory>() {
            Ok(c) => patch.category = Some(c),
            Err(msg) => errors.add("category", msg),
        }
    }
    if let Some(raw) = &form.date {
        match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(d) => patch.date = Some(d),
            Err(_) => errors.add("date", "Please enter a valid date (YYYY-MM-DD)"),
        }
    }
    errors.into_result()?;
    if patch.is_empty() {
        return Err(ValidationError::single("expense", "Nothing to update"));
    }
    Ok(patch)
}

pub fn parse_budget_amount(s: &str) -> Result<Decimal, ValidationError> {
    parse_amount(s)
        .ok_or_else(|| ValidationError::single("amount", "Enter a valid non-negative amount."))
}

pub fn budget(
    amount: &str,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<UpsertBudget, ValidationError> {
    let mut errors = FieldErrors::new();
    let parsed = parse_amount(amount);
    if parsed.is_none() {
        errors.add("amount", "Enter a valid non-negative amount.");
    }
    if let Some(m) = month {
        if !(1..=12).contains(&m) {
            errors.add("month", "Month must be between 1 and 12");
        }
    }
    errors.into_result()?;
    Ok(UpsertBudget {
        amount: parsed.unwrap_or_default(),
        month,
        year,
    })
}
