use std::process;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;

use gocodeo::{Cli, Commands, InitArgs, InitCommand, InitError, LlmAgentFactory, TerminalKeyPrompter, TerminalPrompter};
use gocodeo_llm_api::LlmService;

fn main() {
    let cli = Cli::parse();
    gocodeo_logging::init_logger(cli.verbose);

    let code = match cli.command {
        Commands::Init(args) => run_init(args),
    };
    process::exit(code);
}

fn run_init(args: InitArgs) -> i32 {
    let prompter = match TerminalPrompter::new() {
        Ok(prompter) => prompter,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            return 1;
        }
    };

    let service = Arc::new(LlmService::new(Arc::new(TerminalKeyPrompter)));
    let agents = LlmAgentFactory::new(Arc::clone(&service));

    match InitCommand::new(&prompter, &service, &agents).run(args) {
        Ok(()) => 0,
        Err(e) => {
            report(&e);
            e.exit_code()
        }
    }
}

fn report(error: &InitError) {
    match error {
        InitError::Aborted => eprintln!("{}", error),
        InitError::BuildFailed => eprintln!("\n{}", error.to_string().red()),
        InitError::Build { message } => eprintln!("\n{} {}", "Error:".red(), message),
        _ => eprintln!("{}", error.to_string().red()),
    }
}
