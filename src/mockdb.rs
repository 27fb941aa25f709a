use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use log::{error, info};
use rusqlite::Connection;
use speakingmock::libspeaking::store::{self, SpeakingMock};
use speakingmock::{speaking_test, Error, SpeakingTest};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mockdb")]
#[command(version, about = "Import and export speaking mocks", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "info")]
    log_level: String,
    #[arg(short, long, value_name = "FILE", default_value = "speakingmock.db")]
    db: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a content file as a new mock (the built-in set when no file is given)
    Import {
        json: Option<PathBuf>,
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Write a stored mock out as JSON (stdout when no file is given)
    Export { id: i64, json: Option<PathBuf> },
    /// Replace a stored mock's title and/or content
    Update {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    List,
    Delete { id: i64 },
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    info!("{}", format!("Database at {:?}", args.db).cyan());
    let db = match store::create_or_open(&args.db) {
        Ok(d) => d,
        Err(e) => {
            error!("{}{}", "Unable to open Database: ".red(), e);
            std::process::exit(1);
        }
    };

    let result = run(&db, args.command);
    let closed = store::close_db(db);

    if let Err(e) = result.and(closed) {
        error!("{}", format!("{}!", e).red());
        std::process::exit(1);
    }
}

fn run(db: &Connection, command: Commands) -> Result<(), Error> {
    match command {
        Commands::Import { json, title } => {
            let content = match &json {
                Some(path) => SpeakingTest::from_path(path)?,
                None => speaking_test()?.clone(),
            };
            let title = title.unwrap_or_else(|| {
                json.as_ref()
                    .and_then(|p| p.file_stem())
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "Speaking Mock".to_string())
            });
            let id = SpeakingMock::add(db, &title, &content)?;
            info!(
                "{}",
                format!("├ Mock {}: {} ({} Questions)", id, title, content.len()).green()
            );
        }
        Commands::Export { id, json } => {
            let mock = SpeakingMock::get_by_id(db, id)?;
            match json {
                Some(path) => {
                    mock.content.write_to_path(&path)?;
                    info!("{}", format!("Exported mock {} to {:?}", id, path).green());
                }
                None => println!("{}", mock.content.to_json_pretty()?),
            }
        }
        Commands::Update { id, title, json } => {
            let content = json.map(SpeakingTest::from_path).transpose()?;
            let mock = SpeakingMock::update(db, id, title.as_deref(), content.as_ref())?;
            info!(
                "{}",
                format!("Updated mock {}: {} ({} Questions)", mock.id, mock.title, mock.content.len())
                    .green()
            );
        }
        Commands::List => {
            let mocks = SpeakingMock::get_all(db)?;
            info!("{}", format!("{} Mocks", mocks.len()).blue());
            for mock in mocks {
                println!(
                    "{} {} {}",
                    format!("{:>4}", mock.id).bold(),
                    mock.title,
                    format!("({} questions, {})", mock.content.len(), mock.created_at).dimmed()
                );
            }
        }
        Commands::Delete { id } => {
            SpeakingMock::delete(db, id)?;
            info!("{}", format!("Deleted mock {}", id).green());
        }
    }
    Ok(())
}
