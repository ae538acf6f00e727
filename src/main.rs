use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use quill::ast_printer::AstPrinter;
use quill::error::QuillError;
use quill::scanner::Scanner;
use quill::system::StdSystem;
use quill::token::Token;
use quill::{Program, Session};

#[derive(ClapParser, Debug)]
#[command(version, about = "Quill language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to quill.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: Option<PathBuf>,

        /// Print the token stream as JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints its syntax tree
    Parse { filename: Option<PathBuf> },

    /// Runs input from a file as a Quill program
    Run { filename: Option<PathBuf> },

    /// Starts an interactive session
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    let source = String::from_utf8(buf).map_err(QuillError::from)?;

    Ok(source)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("quill.log").context("Failed to create quill.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'quill::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("quill::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to quill.log");
    Ok(())
}

/// 65 for programs rejected before running, 70 for runtime failures.
fn exit_code(error: &QuillError) -> i32 {
    if error.is_static() {
        65
    } else {
        70
    }
}

fn no_input() -> ! {
    info!("No filepath provided");
    println!("No input filepath was provided. Exiting...");
    std::process::exit(0);
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename, json } => {
            let Some(filename) = filename else { no_input() };

            info!("Running Tokenize subcommand");
            let source = read_file(filename)?;
            let mut tokens: Vec<Token> = Vec::new();
            let mut tokenized = true;

            for token in Scanner::new(&source) {
                match token {
                    Ok(token) => {
                        debug!("Scanned token: {}", token);

                        if !json {
                            println!("{}", token);
                        }
                        tokens.push(token);
                    }

                    Err(e) => {
                        tokenized = false;

                        debug!("Tokenization debug: {}", e);

                        eprintln!("{}", e);
                    }
                }
            }

            if json {
                let rendered =
                    serde_json::to_string_pretty(&tokens).context("Failed to encode tokens")?;
                println!("{}", rendered);
            }

            if !tokenized {
                debug!("Tokenization failed, exiting with code 65");

                std::process::exit(65);
            }

            info!("Tokenization completed successfully");
        }

        Commands::Parse { filename } => {
            let Some(filename) = filename else { no_input() };

            info!("Running Parse subcommand");
            let source = read_file(filename)?;

            match Program::parse(&source) {
                Ok(program) => {
                    let ast_str = AstPrinter::print_program(program.statements());

                    debug!("AST: {}", ast_str);
                    println!("{}", ast_str);
                }

                Err(e) => {
                    debug!("Parse debug: {}", e);
                    eprintln!("{}", e);
                    std::process::exit(exit_code(&e));
                }
            }

            info!("Parse subcommand completed");
        }

        Commands::Run { filename } => {
            let Some(filename) = filename else { no_input() };

            info!("Running Run subcommand");
            let source = read_file(filename)?;
            info!("Provided input:\n {}", source);

            let result = Program::parse(&source).and_then(|program| program.run(StdSystem));

            match result {
                Ok(_) => info!("Program executed successfully"),

                Err(e) => {
                    debug!("Run debug: {}", e);
                    eprintln!("{}", e);
                    std::process::exit(exit_code(&e));
                }
            }
        }

        Commands::Repl => {
            info!("Starting REPL");

            let mut session = Session::new(StdSystem);
            let stdin = io::stdin();

            loop {
                print!("> ");
                io::stdout().flush().context("Failed to flush stdout")?;

                let mut line = String::new();
                let read = stdin
                    .lock()
                    .read_line(&mut line)
                    .context("Failed to read from stdin")?;

                if read == 0 {
                    println!();
                    break;
                }

                if let Err(e) = session.eval(&line) {
                    debug!("REPL debug: {}", e);
                    eprintln!("{}", e);
                }
            }

            info!("REPL finished");
        }
    }

    Ok(())
}
