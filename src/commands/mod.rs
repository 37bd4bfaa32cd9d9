// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod budget;
pub mod chart;
pub mod doctor;
pub mod expenses;
pub mod exporter;

use anyhow::{Context, Result};

/// Value of a required clap argument.
pub(crate) fn arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    m.get_one::<String>(name)
        .with_context(|| format!("missing --{}", name))
}

pub(crate) fn opt(m: &clap::ArgMatches, name: &str) -> Option<String> {
    m.get_one::<String>(name).cloned()
}
