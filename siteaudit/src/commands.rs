use clap::{Arg, arg, command};
use siteaudit_core::catalog::{DEFAULT_BASE_URL, DEFAULT_URL_LIST};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("siteaudit")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("siteaudit")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and progress output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log fetches and check failures to stderr")
                .required(false)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            command!("collect")
                .about("Generate the site's URL list in both locales and write it to a file")
                .arg(base_url_arg())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the newline-delimited URL list")
                        .default_value(DEFAULT_URL_LIST),
                ),
        )
        .subcommand(
            command!("audit")
                .about(
                    "Fetch every URL in the list and check canonical, hreflang, lang, H1, \
                title and description. Exits 1 if any page fails.",
                )
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(false)
                        .help("Newline-delimited URL list to audit")
                        .default_value(DEFAULT_URL_LIST),
                )
                .args(audit_args()),
        )
        .subcommand(
            command!("run")
                .about("Collect the URL list, then audit it")
                .arg(base_url_arg())
                .arg(
                    arg!(--"url-list" <PATH>)
                        .required(false)
                        .help("Intermediate URL list file")
                        .default_value(DEFAULT_URL_LIST),
                )
                .args(audit_args()),
        )
}

fn base_url_arg() -> Arg {
    arg!(-b --"base-url" <URL>)
        .required(false)
        .help("Site origin the URL list is built from")
        .env("BASE_URL")
        .default_value(DEFAULT_BASE_URL)
}

fn audit_args() -> Vec<Arg> {
    vec![
        arg!(-c --"concurrency" <NUM_WORKERS>)
            .required(false)
            .help("Number of pages fetched at once (1 = strictly sequential)")
            .value_parser(clap::value_parser!(usize))
            .default_value("1"),
        arg!(--"delay-ms" <MILLIS>)
            .required(false)
            .help("Pause after each page, in milliseconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("50"),
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Request timeout in seconds")
            .value_parser(clap::value_parser!(u64).range(1..))
            .default_value("10"),
        arg!(--"lang" <CODE>)
            .required(false)
            .help("Accepted <html lang> value (repeatable)")
            .action(clap::ArgAction::Append)
            .default_values(["uk", "ru"]),
        arg!(-f --"format" <FORMAT>)
            .required(false)
            .help("Report format: text, json")
            .value_parser(["text", "json"])
            .default_value("text"),
        arg!(-o --"output" <PATH>)
            .required(false)
            .help("Save report to file (default: display to screen)"),
        arg!(--"no-color")
            .required(false)
            .help("Disable coloured output")
            .action(clap::ArgAction::SetTrue),
    ]
}
