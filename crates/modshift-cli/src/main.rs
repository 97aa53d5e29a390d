//! modshift CLI entry point.

use clap::Parser;
use miette::Result;
use modshift_cli::{cli, commands, error, logger, ui};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let config = args.config.as_deref();
    let result = match args.command {
        cli::Command::Transpile(transpile_args) => {
            commands::transpile_execute(transpile_args, config)
        }
        cli::Command::Build(build_args) => commands::build_execute(build_args, config),
        cli::Command::Check(check_args) => commands::check_execute(check_args, config),
    };

    result.map_err(error::cli_error_to_miette)
}
