use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::{debug, error};
use speakingmock::{speaking_test, Error, SpeakingTest};
use std::path::PathBuf;
use std::process::exit;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "Speaking Mock Test")]
#[command(version, about, long_about = None)]
struct Args {
    /// Load questions from a JSON file instead of the built-in set
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,
    /// Print only this question and exit
    #[arg(short, long)]
    question: Option<u32>,
    /// Print the loaded questions as JSON and exit
    #[arg(long, default_value = "false")]
    json: bool,
    /// No colors
    #[arg(long, default_value = "false")]
    plain: bool,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();
    if args.plain {
        colored::control::set_override(false);
    }

    if let Err(err) = run(&args) {
        error!("{}", format!("{}", err).red());
        if let Error::NotFound { .. } = err {
            println!("{}", format!("{}.", err).yellow());
        }
        exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let owned;
    let test: &SpeakingTest = match &args.data {
        Some(path) => {
            owned = SpeakingTest::from_path(path)?;
            &owned
        }
        None => speaking_test()?,
    };
    debug!("[Setup] {} questions loaded", test.len());

    if args.json {
        println!("{}", test.to_json_pretty()?);
        return Ok(());
    }

    match args.question {
        Some(number) => cli::print_question(test, number),
        None => {
            println!(
                "{}",
                format!("==========> Speaking Mock Test ({} questions) <==========", test.len())
                    .cyan()
            );
            cli::browse_loop(test, 1)
        }
    }
}
