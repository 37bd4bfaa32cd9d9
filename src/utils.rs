// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::filters::BudgetPeriod;

pub fn fmt_money(d: &Decimal) -> String {
    let rounded = d.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", -rounded)
    } else {
        format!("${:.2}", rounded.abs())
    }
}

/// One decimal, truncated, so the printed figure never crosses a status
/// threshold the raw value has not reached.
pub fn fmt_percent(d: &Decimal) -> String {
    let capped = d
        .round_dp_with_strategy(1, RoundingStrategy::ToZero)
        .min(Decimal::from(999));
    format!("{}%", capped.normalize())
}

pub fn month_label(month: NaiveDate) -> String {
    month.format("%b %Y").to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Fills an unset month/year with the current local period.
pub fn resolve_period(month: Option<u32>, year: Option<i32>) -> BudgetPeriod {
    let now = today();
    BudgetPeriod::new(month.unwrap_or(now.month()), year.unwrap_or(now.year()))
}

pub fn month_name(m: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    m.checked_sub(1)
        .and_then(|i| NAMES.get(i as usize))
        .copied()
        .unwrap_or("?")
}

/// Text progress bar, `width` cells wide.
pub fn progress_bar(pct: Decimal, width: usize) -> String {
    let pct = pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (pct * Decimal::from(width as u64) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_and_percent_formatting() {
        assert_eq!(fmt_money(&"12.5".parse().unwrap()), "$12.50");
        assert_eq!(fmt_money(&"-50".parse().unwrap()), "-$50.00");
        assert_eq!(fmt_percent(&Decimal::MAX), "999%");
        assert_eq!(fmt_percent(&"79.66".parse().unwrap()), "79.6%");
        assert_eq!(fmt_percent(&"99.999".parse().unwrap()), "99.9%");
        assert_eq!(fmt_percent(&"50.00".parse().unwrap()), "50%");
    }

    #[test]
    fn bar_is_clamped() {
        assert_eq!(progress_bar(Decimal::from(50), 10), "[#####-----]");
        assert_eq!(progress_bar(Decimal::from(250), 4), "[####]");
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(3), "March");
        assert_eq!(month_name(0), "?");
        assert_eq!(month_label(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()), "Mar 2024");
    }
}
