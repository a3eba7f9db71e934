use atomize::{Lexer, Token, has_atomic_groups, transform_atomic_groups, transform_atomic_groups_debug};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "atomize")]
#[command(about = "Atomize - rewrite regex atomic groups for engines without them")]
#[command(version)]
struct Cli {
    /// Log rewriting steps (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite atomic groups into lookahead-plus-backreference emulation
    Convert {
        /// The pattern to convert
        pattern: String,
        /// Show the intermediate form and resolved groups
        #[arg(short, long)]
        debug: bool,
        /// Print only the converted pattern
        #[arg(short, long, conflicts_with = "debug")]
        raw: bool,
    },
    /// Check whether a pattern contains atomic groups
    Check {
        /// The pattern to check
        pattern: String,
    },
    /// Print the lexeme stream of a pattern
    Scan {
        /// The pattern to scan
        pattern: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Convert {
            pattern,
            debug,
            raw,
        } => cmd_convert(&pattern, debug, raw),
        Commands::Check { pattern } => cmd_check(&pattern),
        Commands::Scan { pattern } => cmd_scan(&pattern),
    }
}

fn init_logger(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}

fn fail(error: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), error);
    std::process::exit(1);
}

fn cmd_convert(pattern: &str, debug: bool, raw: bool) {
    if raw {
        match transform_atomic_groups(pattern) {
            Ok(result) => println!("{}", result),
            Err(e) => fail(e),
        }
        return;
    }

    println!("{}", "Converting pattern...".bold());
    println!("  Input:  {}", pattern.cyan());
    println!();

    if debug {
        match transform_atomic_groups_debug(pattern) {
            Ok(report) => report.report(),
            Err(e) => fail(e),
        }
    } else {
        match transform_atomic_groups(pattern) {
            Ok(result) => {
                println!("{}", "Output:".bold());
                println!("  {}", result.green());
            }
            Err(e) => fail(e),
        }
    }
}

fn cmd_check(pattern: &str) {
    if has_atomic_groups(pattern) {
        println!("{}", "true".green());
        std::process::exit(0);
    } else {
        println!("{}", "false".red());
        std::process::exit(1);
    }
}

fn cmd_scan(pattern: &str) {
    for lexeme in Lexer::new(pattern) {
        let text = lexeme.text(pattern);
        let token = lexeme.token.to_string();
        let token = match lexeme.token {
            Token::GroupStart(_) | Token::GroupEnd => token.cyan(),
            Token::BackrefNum(_) => token.yellow(),
            Token::CharClassOpen | Token::CharClassClose => token.magenta(),
            Token::Other => token.normal(),
        };
        println!(
            "  {:>4}..{:<4} {:<8} {}",
            lexeme.span.start,
            lexeme.span.end,
            text.green(),
            token
        );
    }
}
