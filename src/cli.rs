// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn filter_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("category").long("category").help("Food, Transport, Utilities, Other or all"))
        .arg(Arg::new("month").long("month").help("Month number 1-12"))
        .arg(Arg::new("year").long("year").help("Four-digit year"))
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("month")
            .long("month")
            .value_parser(value_parser!(u32).range(1..=12))
            .help("Month number 1-12 (default: current month)"),
    )
    .arg(
        Arg::new("year")
            .long("year")
            .value_parser(value_parser!(i32))
            .help("Year (default: current year)"),
    )
}

/// Lets `-5` through to the form validator instead of failing as a flag.
fn amount_arg(arg: Arg) -> Arg {
    arg.allow_negative_numbers(true)
}

pub fn build_cli() -> Command {
    Command::new("spendtrack")
        .about("Track expenses and a monthly budget against the spendtrack API")
        .version(clap::crate_version!())
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .help("API base URL (overrides SPENDTRACK_API_URL and config.json)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v info, -vv debug)"),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in and store the session token")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account and sign in")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(Command::new("logout").about("End the session"))
        .subcommand(json_flags(Command::new("whoami").about("Show the signed-in user")))
        .subcommand(
            Command::new("expense")
                .about("Manage expenses")
                .subcommand_required(true)
                .subcommand(json_flags(filter_args(
                    Command::new("list").about("List expenses, optionally filtered"),
                )))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show a single expense")
                        .arg(Arg::new("id").required(true)),
                ))
                .subcommand(
                    Command::new("add")
                        .about("Record an expense")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(amount_arg(Arg::new("amount").long("amount").required(true)))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD (default: today)")),
                )
                .subcommand(
                    Command::new("update")
                        .about("Change fields of an expense")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("title").long("title"))
                        .arg(amount_arg(Arg::new("amount").long("amount")))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete an expense")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(filter_args(
                    Command::new("export")
                        .about("Export expenses to a file")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )),
        )
        .subcommand(json_flags(
            Command::new("chart").about("Spending per category or per month").arg(
                Arg::new("by")
                    .long("by")
                    .value_parser(["category", "month"])
                    .default_value("category"),
            ),
        ))
        .subcommand(
            Command::new("budget")
                .about("Monthly budget tracker")
                .subcommand_required(true)
                .subcommand(json_flags(period_args(
                    Command::new("show").about("Budget status for a month"),
                )))
                .subcommand(period_args(
                    Command::new("set")
                        .about("Set (or overwrite) the budget for a month")
                        .arg(amount_arg(Arg::new("amount").required(true))),
                )),
        )
        .subcommand(Command::new("doctor").about("Check API reachability and session"))
}
