// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::arg;
use crate::budget_status::{BudgetStatus, classify};
use crate::filters::BudgetPeriod;
use crate::models::BudgetSummary;
use crate::tracker::Tracker;
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, month_name, pretty_table, progress_bar,
    resolve_period,
};
use anyhow::Result;

pub fn handle(tracker: &Tracker, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(tracker, sub)?,
        Some(("set", sub)) => set(tracker, sub)?,
        _ => {}
    }
    Ok(())
}

fn period_from(sub: &clap::ArgMatches) -> BudgetPeriod {
    resolve_period(
        sub.get_one::<u32>("month").copied(),
        sub.get_one::<i32>("year").copied(),
    )
}

fn show(tracker: &Tracker, sub: &clap::ArgMatches) -> Result<()> {
    let summary = tracker.budget_summary(period_from(sub))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &*summary)? {
        for line in report(&summary) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn set(tracker: &Tracker, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_from(sub);
    let summary = tracker.upsert_budget(arg(sub, "amount")?, period)?;
    println!("Budget saved successfully.");
    for line in report(&summary) {
        println!("{}", line);
    }
    Ok(())
}

/// The budget tracker view as printable lines.
pub fn report(s: &BudgetSummary) -> Vec<String> {
    let c = classify(s.amount(), s.total_expenses);
    let mut out = vec![format!(
        "{} {}: {}",
        month_name(s.month),
        s.year,
        s.status.label()
    )];
    let dash = || "--".to_string();
    let row = vec![
        s.amount().map(|a| fmt_money(&a)).unwrap_or_else(dash),
        fmt_money(&s.total_expenses),
        if s.has_budget { fmt_money(&s.remaining) } else { dash() },
        if s.has_budget { fmt_percent(&s.percentage) } else { dash() },
    ];
    out.push(pretty_table(&["Budget", "Spent", "Remaining", "Used"], vec![row]).to_string());
    if s.has_budget {
        out.push(format!(
            "{} {}",
            progress_bar(c.display_percentage(), 30),
            fmt_percent(&s.percentage)
        ));
    }
    out.push(s.status.advice().to_string());
    if s.status == BudgetStatus::Danger {
        match c.overspent() {
            Some(over) => out.push(format!(
                "Spending has exceeded the budget by {}. Review recent expenses to regain control.",
                fmt_money(&over)
            )),
            None => out.push("The budget is fully used.".to_string()),
        }
    }
    out
}
