//! Command-line front end: match a file against a JCBNF grammar.
#![allow(clippy::multiple_crate_versions)]

use std::process::ExitCode;
use std::str::FromStr;

use facet::Facet;
use jcbnf::codepoints::codepoints;
use jcbnf::{load_grammar, validate, MatchEngine, ParseReport};

/// Command-line arguments.
#[derive(Facet, Debug)]
struct Args {
    /// Path to the grammar file.
    #[facet(positional)]
    grammar: String,

    /// Path to the input file.
    #[facet(positional)]
    input: String,

    /// Definition to match from; `main` when omitted.
    #[facet(named, short = 'm', default)]
    main: Option<String>,

    /// Print the parse tree as JSON.
    #[facet(named, short = 'j', default)]
    json: bool,
}

fn init_logging() {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| log::LevelFilter::from_str(&level).ok())
        .unwrap_or(log::LevelFilter::Warn);
    // A logger that is already installed is fine.
    let _ = simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    );
}

fn run(args: &Args) -> Result<bool, String> {
    let grammar = std::fs::read_to_string(&args.grammar)
        .map_err(|e| format!("cannot read {}: {e}", args.grammar))?;
    let input = std::fs::read_to_string(&args.input)
        .map_err(|e| format!("cannot read {}: {e}", args.input))?;
    let main = args.main.as_deref().unwrap_or("main");

    let registry = load_grammar(&grammar).map_err(|e| e.to_string())?;
    validate(&registry, main).map_err(|e| e.to_string())?;

    let input = codepoints(&input);
    let engine = MatchEngine::new(&registry);
    let Some(tree) = engine.parse_root(main, &input).map_err(|e| e.to_string())? else {
        return Ok(false);
    };

    let report = ParseReport::from_tree(&tree, &input);
    if args.json {
        println!("{}", report.to_json());
    } else {
        print!("{}", report.outline());
    }
    Ok(true)
}

fn main() -> ExitCode {
    init_logging();
    let args: Args = match facet_args::from_std_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            println!("no match");
            ExitCode::from(1)
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(2)
        }
    }
}
