// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{arg, opt};
use crate::filters::ExpenseFilterInput;
use crate::models::Expense;
use crate::tracker::Tracker;
use crate::utils::{fmt_money, maybe_print_json, pretty_table, today};
use crate::validation::{ExpenseForm, ExpensePatchForm};
use anyhow::Result;

pub fn handle(tracker: &Tracker, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(tracker, sub)?,
        Some(("show", sub)) => show(tracker, sub)?,
        Some(("add", sub)) => add(tracker, sub)?,
        Some(("update", sub)) => update(tracker, sub)?,
        Some(("rm", sub)) => remove(tracker, sub)?,
        Some(("export", sub)) => super::exporter::export_expenses(tracker, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn filters_from(sub: &clap::ArgMatches) -> ExpenseFilterInput {
    ExpenseFilterInput {
        category: opt(sub, "category"),
        month: opt(sub, "month"),
        year: opt(sub, "year"),
    }
}

pub fn expense_rows(items: &[Expense]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|e| {
            vec![
                e.date.to_string(),
                e.title.clone(),
                e.category.to_string(),
                fmt_money(&e.amount),
                e.id.clone(),
            ]
        })
        .collect()
}

fn list(tracker: &Tracker, sub: &clap::ArgMatches) -> Result<()> {
    let items = tracker.expenses(&filters_from(sub))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &*items)? {
        if items.is_empty() {
            println!("No expenses found");
            return Ok(());
        }
        let total: rust_decimal::Decimal = items.iter().map(|e| e.amount).sum();
        println!(
            "{}",
            pretty_table(&["Date", "Title", "Category", "Amount", "ID"], expense_rows(&items))
        );
        println!("{} expense(s), total {}", items.len(), fmt_money(&total));
    }
    Ok(())
}

fn show(tracker: &Tracker, sub: &clap::ArgMatches) -> Result<()> {
    let e = tracker.expense(arg(sub, "id")?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &*e)? {
        println!(
            "{}",
            pretty_table(
                &["Date", "Title", "Category", "Amount", "ID"],
                expense_rows(std::slice::from_ref(&*e)),
            )
        );
    }
    Ok(())
}

fn add(tracker: &Tracker, sub: &clap::ArgMatches) -> Result<()> {
    let form = ExpenseForm {
        title: arg(sub, "title")?.clone(),
        amount: arg(sub, "amount")?.clone(),
        category: arg(sub, "category")?.clone(),
        date: opt(sub, "date"),
    };
    let e = tracker.create_expense(&form, today())?;
    println!(
        "Recorded {} for '{}' ({}) on {} [id {}]",
        fmt_money(&e.amount),
        e.title,
        e.category,
        e.date,
        e.id
    );
    Ok(())
}

fn update(tracker: &Tracker, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id")?;
    let form = ExpensePatchForm {
        title: opt(sub, "title"),
        amount: opt(sub, "amount"),
        category: opt(sub, "category"),
        date: opt(sub, "date"),
    };
    let e = tracker.update_expense(id, &form)?;
    println!(
        "Updated {}: '{}' {} {} on {}",
        e.id,
        e.title,
        e.category,
        fmt_money(&e.amount),
        e.date
    );
    Ok(())
}

fn remove(tracker: &Tracker, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id")?;
    tracker.delete_expense(id)?;
    println!("Deleted expense {}", id);
    Ok(())
}
