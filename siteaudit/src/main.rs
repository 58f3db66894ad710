use siteaudit::commands::command_argument_builder;
use siteaudit::handlers::{handle_audit, handle_collect, handle_run, init_tracing};
use siteaudit_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing(chosen_command.get_flag("verbose"));

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let code = match chosen_command.subcommand() {
        Some(("collect", primary_command)) => handle_collect(primary_command),
        Some(("audit", primary_command)) => handle_audit(primary_command).await,
        Some(("run", primary_command)) => handle_run(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    std::process::exit(code);
}
