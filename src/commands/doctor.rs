// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{ApiError, TrackerError};
use crate::tracker::Tracker;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(tracker: &Tracker, api_url: &str) -> Result<()> {
    let mut rows = Vec::new();

    // 1) API reachability
    if let Err(e) = tracker.api().health() {
        rows.push(vec!["api_unreachable".into(), format!("{}: {}", api_url, e)]);
    }

    // 2) Session
    if !tracker.api().session().is_authenticated() {
        rows.push(vec!["not_signed_in".into(), "run `spendtrack login`".into()]);
    } else {
        match tracker.me() {
            Ok(_) => {}
            Err(TrackerError::Api(ApiError::Unauthorized)) => {
                rows.push(vec!["session_expired".into(), "stored token was rejected".into()]);
            }
            Err(e) => rows.push(vec!["session_check_failed".into(), e.to_string()]),
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
