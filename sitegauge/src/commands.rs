use crate::CLAP_STYLING;
use clap::{arg, command};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitegauge")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitegauge")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Initializes the sitegauge result database on your filesystem")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location to store the sitegauge database")
                        .default_value("~/.config/sitegauge/"),
                )
                .arg(
                    arg!(-f - -"force")
                        .help(
                            "Forces the overwriting of any existing database at the \
                            specified location.",
                        )
                        .required(false),
                ),
        )
        .subcommand(
            command!("analyze")
                .about(
                    "Analyze a website across SEO, performance, content and technical \
                    dimensions, and print scored results with recommendations.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The URL to analyze (scheme optional, http assumed)"),
                )
                .arg(
                    arg!(--"no-ai")
                        .required(false)
                        .help("Skip the AI recommendation path even if a key is configured")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-d --"db" <PATH>)
                        .required(false)
                        .help("Path to the result database")
                        .default_value("~/.config/sitegauge/sitegauge.db"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("report")
                .about("Render the cached analysis for a URL without recomputing it")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The URL whose cached analysis to render"),
                )
                .arg(
                    arg!(-d --"db" <PATH>)
                        .required(false)
                        .help("Path to the result database")
                        .default_value("~/.config/sitegauge/sitegauge.db"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown"])
                        .default_value("text"),
                ),
        )
}
