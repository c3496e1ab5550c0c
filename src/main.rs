use std::{
    error::Error as StdError,
    fs,
    path::{Path, PathBuf},
    process,
    time::Instant,
};

use clap::Parser as _;
use log::{info, LevelFilter};
use sc_frontend::{
    errors::errors::{Error, ErrorTip},
    get_line_at_position,
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::infer,
};

/// Parses and type checks a source file.
#[derive(clap::Parser)]
#[command(version)]
struct Args {
    /// Source file. It must start with an empty line.
    file: PathBuf,

    /// Print every token before parsing
    #[arg(long)]
    tokens: bool,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn StdError>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    simple_logger::SimpleLogger::new().with_level(level).env().init()?;

    let source = fs::read(&args.file)?;

    if args.tokens {
        match tokenize(&source) {
            Ok(tokens) => {
                for token in tokens {
                    println!("{} {:?}", token, token.text_lossy(&source));
                }
            }
            Err(error) => fail(Error::Lex(error), &source, &args.file),
        }
    }

    let start = Instant::now();

    let mut ast = parse(&source).unwrap_or_else(|error| fail(error.into(), &source, &args.file));
    info!("Parsed in {:?}", start.elapsed());

    let infer_start = Instant::now();
    infer(&mut ast).unwrap_or_else(|error| fail(error.into(), &source, &args.file));
    info!("Type checked in {:?}", infer_start.elapsed());

    info!(
        "{} statements, {} function scopes, total time {:?}",
        ast.body().len(),
        ast.scopes.len(),
        start.elapsed()
    );

    Ok(())
}

fn fail(error: Error, source: &[u8], file: &Path) -> ! {
    display_error(&error, source, file);
    process::exit(1)
}

fn display_error(error: &Error, source: &[u8], file: &Path) {
    /*
        Error: InvalidTokenSequence
        -> main.sc
           |
         2 | x: 1 + 2 3
           | ---------^
    */

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", file.as_os_str().to_string_lossy());

    let span = error.get_span();

    if let Some((line, line_text, line_pos)) = get_line_at_position(source, span.start) {
        let line_str = line.to_string();
        let padding = line_str.len() + 2;

        println!("{:>padding$}", "|");

        let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
        println!("{} | {}", line_str, line_text_removed.trim_end());

        let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
        println!("{:>padding$} {:->arrows$}", "|", "^");
    } else {
        let position = error.get_position();
        println!("   at end of input, line {} column {}", position.line, position.column);
    }

    println!();
    println!("{}", error);
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();

    (String::from(&string[start..]), start)
}
