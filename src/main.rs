// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spendtrack::api::{ApiClient, HttpTransport};
use spendtrack::config::{self, Settings};
use spendtrack::error::TrackerError;
use spendtrack::session::{FileTokenStore, Session};
use spendtrack::tracker::Tracker;
use spendtrack::{cli, commands};

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("SPENDTRACK_LOG")
                .unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    let settings = Settings::load(matches.get_one::<String>("api-url").map(String::as_str))?;
    let session = Arc::new(Session::new(FileTokenStore::new(config::session_path()?)));
    session.on_unauthorized(|ev| {
        eprintln!(
            "{}",
            ev.message
                .as_deref()
                .unwrap_or("Your session has expired. Please log in again.")
        );
    });
    let transport = Arc::new(HttpTransport::new(&settings)?);
    let tracker = Tracker::new(ApiClient::new(transport, session));

    match matches.subcommand() {
        Some(("login", sub)) => commands::auth::login(&tracker, sub)?,
        Some(("register", sub)) => commands::auth::register(&tracker, sub)?,
        Some(("logout", _)) => commands::auth::logout(&tracker)?,
        Some(("whoami", sub)) => commands::auth::whoami(&tracker, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&tracker, sub)?,
        Some(("chart", sub)) => commands::chart::handle(&tracker, sub)?,
        Some(("budget", sub)) => commands::budget::handle(&tracker, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&tracker, &settings.api_url)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<TrackerError>() {
                Some(TrackerError::Invalid(v)) => {
                    for (field, msg) in v.fields().iter() {
                        eprintln!("{}: {}", field, msg);
                    }
                }
                Some(TrackerError::Api(api)) => eprintln!("error: {}", api.banner()),
                _ => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}
