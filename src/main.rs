use anyhow::Result;
use revar::cli::{self, ColorChoice};
use revar::{MatchFormatter, StdinPrompt, config, logger, processor};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match cli::try_parse_args() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::from(1);
        }
        // --help and --version
        Err(e) => e.exit(),
    };

    match execute(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn execute(args: cli::Args) -> Result<()> {
    let config = config::load_config();

    let debug = args.options.debug || config.logging.debug;
    logger::init_logging(debug, config.logging.file.as_deref())?;

    let color = args
        .color
        .unwrap_or_else(|| ColorChoice::from_config(&config.display.color))
        .should_color();
    colored::control::set_override(color);

    let mut prompt = StdinPrompt::new();
    let mut stdout = io::stdout();
    processor::run(
        &args.regex,
        &args.replacement,
        &args.path,
        &args.options,
        MatchFormatter::new(color),
        &mut prompt,
        &mut stdout,
    )?;

    Ok(())
}
