use sitegauge::commands::command_argument_builder;
use sitegauge::handlers::{handle_analyze, handle_init, handle_report};
use sitegauge::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    tracing_subscriber::fmt::init();

    match chosen_command.subcommand() {
        Some(("init", primary_command)) => handle_init(primary_command),
        Some(("analyze", primary_command)) => {
            if let Err(e) = handle_analyze(primary_command).await {
                eprintln!("✗ Analysis failed: {e}");
                std::process::exit(1);
            }
        }
        Some(("report", primary_command)) => {
            if let Err(e) = handle_report(primary_command).await {
                eprintln!("✗ Report failed: {e}");
                std::process::exit(1);
            }
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
