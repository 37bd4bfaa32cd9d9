// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::arg;
use crate::tracker::Tracker;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn login(tracker: &Tracker, sub: &clap::ArgMatches) -> Result<()> {
    let auth = tracker.login(arg(sub, "email")?, arg(sub, "password")?)?;
    println!("Signed in as {} <{}>", auth.user.name, auth.user.email);
    Ok(())
}

pub fn register(tracker: &Tracker, sub: &clap::ArgMatches) -> Result<()> {
    let auth = tracker.register(
        arg(sub, "name")?,
        arg(sub, "email")?,
        arg(sub, "password")?,
    )?;
    println!("Welcome, {}! Account created for {}", auth.user.name, auth.user.email);
    Ok(())
}

pub fn logout(tracker: &Tracker) -> Result<()> {
    tracker.logout()?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(tracker: &Tracker, sub: &clap::ArgMatches) -> Result<()> {
    let user = tracker.me()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &*user)? {
        println!(
            "{}",
            pretty_table(
                &["Name", "Email", "Member since"],
                vec![vec![
                    user.name.clone(),
                    user.email.clone(),
                    user.created_at.date_naive().to_string(),
                ]],
            )
        );
    }
    Ok(())
}
