use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::{info, LevelFilter};

use versenote_db::convert::convert_json_to_db;
use versenote_db::models::{VerseLocator, VerseRecord};
use versenote_db::table_name::TableName;
use versenote_db::{BibleDatabase, DbError, SwordDrill};

/// CLI for storing and looking up Bible verses
#[derive(Parser, Debug)]
#[command(name = "versenote", version)]
struct Cli {
    /// Log progress, not only warnings
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Converts a JSON file of verses into a SQLite store
    Convert {
        /// The source file in JSON
        #[arg(long)]
        src: PathBuf,

        /// The destination file in .db
        #[arg(long)]
        dest: String,
    },

    /// Looks up a reference such as "John 3:16" or "Genesis 1:1-5"
    Query {
        /// The Bible reference to look up
        reference: String,

        /// The SQLite store to read from
        #[arg(long, env = "DATABASE_URL")]
        db: String,

        /// Print the verses as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("An error occurred: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Convert { src, dest } => {
            if !(has_extension(&src, "json") && has_extension(Path::new(&dest), "db")) {
                return Err("the src file must be .json and the destination .db".into());
            }
            let inserted = convert_json_to_db(&src, &dest)?;
            info!("Wrote {} verses to {}", inserted, dest);
            Ok(())
        }
        Command::Query {
            reference,
            db,
            json,
        } => {
            let locator: VerseLocator = reference.parse()?;
            let verses = BibleDatabase::new(db).resolve::<SwordDrill>(&locator)?;

            let stdout = io::stdout();
            let mut out = stdout.lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &verses)?;
                writeln!(out)?;
            } else {
                write_verses(&mut out, &heading(&locator)?, &verses)?;
            }
            Ok(())
        }
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().map_or(false, |e| e == ext)
}

/// The locator with its book name normalized for display.
fn heading(locator: &VerseLocator) -> Result<String, DbError> {
    Ok(VerseLocator {
        book: TableName::for_book(&locator.book)?.display_name(),
        ..locator.clone()
    }
    .to_string())
}

fn write_verses<W: Write>(out: &mut W, heading: &str, verses: &[VerseRecord]) -> io::Result<()> {
    writeln!(out, "{}", heading)?;
    for v in verses {
        writeln!(out, "{} {}", v.verse, v.text.trim())?;
        if !v.comment.is_empty() {
            writeln!(out, "    {}", v.comment)?;
        }
    }
    Ok(())
}
