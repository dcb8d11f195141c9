use super::args::{Cli, Commands, ConfigCommand};
use super::handlers;
use crate::context::ExecutionContext;
use crate::logging;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    let ctx = ExecutionContext::new(cli.data_dir.as_deref(), cli.config)?;

    match cli.command {
        Commands::View {
            events,
            symbols,
            follow,
        } => {
            let log_file = cli.log_file.unwrap_or_else(|| ctx.default_log_file());
            logging::init_file(cli.log_level, &log_file)?;
            handlers::view::handle(ctx.config()?, &events, symbols.as_deref(), follow)
        }

        Commands::Dump {
            events,
            select,
            symbols,
            no_color,
        } => {
            logging::init_stderr(cli.log_level);
            handlers::dump::handle(
                ctx.config()?,
                &events,
                select,
                symbols.as_deref(),
                no_color,
            )
        }

        Commands::Config { command } => match command {
            ConfigCommand::Init { force } => handlers::config::init(&ctx, force),
            ConfigCommand::Show => handlers::config::show(&ctx),
        },
    }
}
