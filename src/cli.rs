// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

const PERIODS: [&str; 5] = ["day", "week", "month", "quarter", "year"];
const KINDS: [&str; 4] = ["expense", "income", "mileage", "hours"];

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn range_args() -> [Arg; 4] {
    [
        Arg::new("from").long("from").help("First day, YYYY-MM-DD"),
        Arg::new("to").long("to").help("Last day (inclusive), YYYY-MM-DD"),
        Arg::new("period")
            .long("period")
            .value_parser(PERIODS)
            .conflicts_with_all(["from", "to"])
            .help("Calendar period containing --at"),
        Arg::new("at")
            .long("at")
            .requires("period")
            .help("Reference date/time for --period (default: now)"),
    ]
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true).help("Record id (UUID)")
}

fn list_cmd(about: &'static str) -> Command {
    Command::new("list")
        .about(about)
        .args(range_args())
        .args(json_args())
        .arg(
            Arg::new("limit")
                .long("limit")
                .value_parser(value_parser!(usize)),
        )
}

fn rm_cmd() -> Command {
    Command::new("rm").about("Delete a record").arg(id_arg())
}

fn deductible_args() -> [Arg; 2] {
    [
        Arg::new("deductible")
            .long("deductible")
            .value_parser(value_parser!(bool))
            .help("Override whether the entry is tax deductible (true|false)"),
        Arg::new("pct")
            .long("pct")
            .value_parser(value_parser!(i32))
            .allow_negative_numbers(true)
            .help("Business-use percentage, 0-100"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("drivenote")
        .about("Expense, income, mileage and work-hours tracker for rideshare drivers")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("expense")
                .about("Vehicle and business expenses")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("description").long("description"))
                        .args(deductible_args())
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .value_parser(["manual", "ocr"])
                                .default_value("manual"),
                        )
                        .arg(Arg::new("mileage").long("mileage").help("Related mileage id")),
                )
                .subcommand(
                    list_cmd("List expenses")
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(Command::new("show").arg(id_arg()).args(json_args()))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("income")
                .about("Fares and tips")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("tip").long("tip").default_value("0"))
                        .arg(Arg::new("source").long("source").default_value("uber"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(list_cmd("List income"))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("mileage")
                .about("Trips and odometer readings")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("start").long("start").requires("end"))
                        .arg(Arg::new("end").long("end").requires("start"))
                        .arg(
                            Arg::new("distance")
                                .long("distance")
                                .conflicts_with_all(["start", "end"]),
                        )
                        .arg(Arg::new("purpose").long("purpose"))
                        .args(deductible_args())
                        .arg(
                            Arg::new("fuel-expense")
                                .long("fuel-expense")
                                .help("Related fuel expense id"),
                        ),
                )
                .subcommand(list_cmd("List mileage"))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("hours")
                .about("Work shifts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").help("Defaults to --start"))
                        .arg(Arg::new("start").long("start").requires("end"))
                        .arg(Arg::new("end").long("end").requires("start"))
                        .arg(
                            Arg::new("hours")
                                .long("hours")
                                .conflicts_with_all(["start", "end"]),
                        )
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(list_cmd("List work hours"))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Period summary, metrics and chart")
                .arg(
                    Arg::new("period")
                        .long("period")
                        .value_parser(PERIODS)
                        .default_value("month"),
                )
                .arg(Arg::new("at").long("at"))
                .args(json_args()),
        )
        .subcommand(
            Command::new("report")
                .about("Per-domain analytics")
                .subcommand(
                    Command::new("expenses")
                        .args(range_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("mileage")
                        .args(range_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("hourly")
                        .args(range_args())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write records to a file")
                .arg(
                    Arg::new("kind")
                        .required(true)
                        .value_parser(KINDS),
                )
                .arg(Arg::new("format").long("format").default_value("csv"))
                .arg(Arg::new("out").long("out").required(true))
                .args(range_args()),
        )
        .subcommand(
            Command::new("sync")
                .about("Local upload flags")
                .subcommand(Command::new("status").args(json_args()))
                .subcommand(
                    Command::new("mark")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .value_parser(KINDS),
                        )
                        .arg(id_arg()),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored records for inconsistencies"))
        .subcommand(
            Command::new("settings")
                .about("Preferences")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-currency").arg(Arg::new("symbol").required(true)),
                ),
        )
}
