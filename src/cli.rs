// Copyright (c) 2025 Soumyadip Sarkar.
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
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id").required(true).help(help)
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and inspect income/expense transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .value_parser(["income", "expense"]),
                )
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("description").long("description").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("YYYY-MM-DD, defaults to today"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions, most recent first")
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["income", "expense"]),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(id_arg("Transaction id")),
        )
}

fn subscription_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("name").long("name").required(required))
        .arg(Arg::new("amount").long("amount").required(required))
        .arg(
            Arg::new("frequency")
                .long("frequency")
                .required(required)
                .value_parser(["weekly", "monthly", "quarterly", "yearly"]),
        )
        .arg(Arg::new("category").long("category").required(required))
        .arg(Arg::new("description").long("description"))
        .arg(
            Arg::new("start")
                .long("start")
                .help("First billing date YYYY-MM-DD"),
        )
        .arg(
            Arg::new("remind")
                .long("remind")
                .help("Days-before-due offsets, e.g. 3,1 (allowed: 1, 3, 7)"),
        )
        .arg(Arg::new("color").long("color").help("#RRGGBB"))
        .arg(Arg::new("icon").long("icon"))
}

fn sub_cmd() -> Command {
    Command::new("sub")
        .about("Manage recurring subscriptions")
        .subcommand_required(true)
        .subcommand(
            subscription_fields(Command::new("add").about("Add a subscription"), true).arg(
                Arg::new("no-auto-renew")
                    .long("no-auto-renew")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(json_flags(
            Command::new("list").about("List subscriptions").arg(
                Arg::new("status")
                    .long("status")
                    .value_parser(["active", "paused", "cancelled"]),
            ),
        ))
        .subcommand(
            subscription_fields(
                Command::new("update")
                    .about("Change fields of a subscription")
                    .arg(id_arg("Subscription id")),
                false,
            )
            .arg(
                Arg::new("auto-renew")
                    .long("auto-renew")
                    .value_parser(value_parser!(bool)),
            ),
        )
        .subcommand(
            Command::new("cancel")
                .about("Cancel a subscription for good")
                .arg(id_arg("Subscription id")),
        )
        .subcommand(
            Command::new("toggle")
                .about("Pause or resume a subscription")
                .arg(id_arg("Subscription id")),
        )
        .subcommand(
            Command::new("pay")
                .about("Record a payment and advance the billing cycle")
                .arg(id_arg("Subscription id")),
        )
        .subcommand(json_flags(
            Command::new("upcoming")
                .about("Active subscriptions by next payment date")
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(json_flags(
            Command::new("stats").about("Subscription counts and monthly cost"),
        ))
        .subcommand(Command::new("seed-samples").about("Add a demo set of subscriptions"))
}

fn remind_cmd() -> Command {
    Command::new("remind")
        .about("Bill reminders")
        .subcommand_required(true)
        .subcommand(Command::new("check").about("Generate reminders that are due now"))
        .subcommand(json_flags(
            Command::new("list")
                .about("List reminders that are not dismissed")
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Include dismissed reminders"),
                ),
        ))
        .subcommand(
            Command::new("read")
                .about("Mark a reminder read")
                .arg(id_arg("Reminder id")),
        )
        .subcommand(
            Command::new("dismiss")
                .about("Dismiss a reminder")
                .arg(id_arg("Reminder id")),
        )
        .subcommand(
            Command::new("watch")
                .about("Check reminders periodically until interrupted")
                .arg(
                    Arg::new("interval-secs")
                        .long("interval-secs")
                        .value_parser(value_parser!(u64).range(1..))
                        .help("Seconds between checks (default: one hour)"),
                ),
        )
}

pub fn build_cli() -> Command {
    Command::new("budgetquest")
        .about("Track income and expenses, manage subscriptions, earn badges")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(tx_cmd())
        .subcommand(json_flags(
            Command::new("summary").about("Income, expense and balance totals"),
        ))
        .subcommand(
            Command::new("game")
                .about("Badges, weekly challenge and streak")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("status").about("Show progress"),
                )),
        )
        .subcommand(sub_cmd())
        .subcommand(remind_cmd())
        .subcommand(
            Command::new("config")
                .about("Read and change settings")
                .subcommand_required(true)
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .required(true)
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }
}
