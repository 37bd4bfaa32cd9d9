// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::arg;
use super::expenses::filters_from;
use crate::models::Expense;
use crate::tracker::Tracker;
use anyhow::{Context, Result, bail};
use std::path::Path;

pub fn export_expenses(tracker: &Tracker, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = arg(sub, "format")?.to_lowercase();
    let out = arg(sub, "out")?;
    let items = tracker.expenses(&filters_from(sub))?;
    write_expenses(&items, &fmt, Path::new(out))?;
    println!("Exported {} expense(s) to {}", items.len(), out);
    Ok(())
}

pub fn write_expenses(items: &[Expense], fmt: &str, out: &Path) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            wtr.write_record(["date", "title", "category", "amount", "id"])?;
            for e in items {
                wtr.write_record([
                    e.date.to_string(),
                    e.title.clone(),
                    e.category.to_string(),
                    e.amount.to_string(),
                    e.id.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(items)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}
