use anyhow::Result;
use bidscope::cli::{self, Command};
use bidscope::context::StandardContext;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = cli::parse_args(&args)?;

    let level = if invocation.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    // Logging must never prevent the command from running.
    let _ = TermLogger::init(
        level,
        ConfigBuilder::new().set_time_level(LevelFilter::Off).build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    if invocation.command == Command::Help {
        cli::print_help("bidscope");
        return Ok(());
    }

    let ctx = StandardContext::new(invocation.root);
    cli::run(&ctx, invocation.command)
}
