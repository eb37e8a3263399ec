//! CLI entry point for the battle binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use battle::run_battle;
use mars_core::MatchSettings;

const HELP_TEXT: &str = "\
Usage: battle <warrior1> <warrior2> [options]

Options:
  --id1 N            warrior 1 identifier (default 1)
  --id2 N            warrior 2 identifier (default 2)
  --core-size N      arena size (default 8000)
  --max-cycles N     cycles per round (default 80000)
  --max-processes N  per-warrior process cap (default 8000)
  --read-limit N     read distance cap (default 8000)
  --write-limit N    write distance cap (default 8000)
  --min-distance N   minimum placement distance (default 100)
  --max-length N     warrior length cap (default 100)
  --rounds N         rounds to play (default 10)
  --seed N           placement seed; <= 0 draws from OS entropy
  --icws88           validate warriors against the 1988 rules
  --help             print this help";

#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    warrior1: PathBuf,
    warrior2: PathBuf,
    warrior1_id: i32,
    warrior2_id: i32,
    settings: MatchSettings,
    icws88: bool,
}

#[derive(Debug)]
enum ParseResult {
    Args(CliArgs),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut warriors: Vec<PathBuf> = Vec::new();
    let mut warrior1_id = 1_i32;
    let mut warrior2_id = 2_i32;
    let mut settings = MatchSettings::default();
    let mut icws88 = false;

    while let Some(arg) = args.next() {
        if arg == "--help" {
            return Ok(ParseResult::Help);
        }

        if arg == "--icws88" {
            icws88 = true;
            continue;
        }

        let text = arg.to_string_lossy().into_owned();
        if let Some(flag) = [
            "--id1",
            "--id2",
            "--core-size",
            "--max-cycles",
            "--max-processes",
            "--read-limit",
            "--write-limit",
            "--min-distance",
            "--max-length",
            "--rounds",
            "--seed",
        ]
        .into_iter()
        .find(|flag| *flag == text)
        {
            let value = numeric_value(flag, args.next())?;
            match flag {
                "--id1" => warrior1_id = value as i32,
                "--id2" => warrior2_id = value as i32,
                "--core-size" => settings.core_size = value as i32,
                "--max-cycles" => settings.max_cycles = value as i32,
                "--max-processes" => settings.max_processes = value as i32,
                "--read-limit" => settings.read_limit = value as i32,
                "--write-limit" => settings.write_limit = value as i32,
                "--min-distance" => settings.min_distance = value as i32,
                "--max-length" => settings.max_warrior_length = value as i32,
                "--rounds" => settings.rounds = value as i32,
                _ => settings.seed = value,
            }
            continue;
        }

        if text.starts_with('-') {
            return Err(format!("unknown option: {text}"));
        }

        if warriors.len() == 2 {
            return Err(String::from("more than two warrior paths provided"));
        }
        warriors.push(PathBuf::from(arg));
    }

    let mut warriors = warriors.into_iter();
    let warrior1 = warriors
        .next()
        .ok_or_else(|| String::from("missing warrior paths"))?;
    let warrior2 = warriors
        .next()
        .ok_or_else(|| String::from("missing second warrior path"))?;

    Ok(ParseResult::Args(CliArgs {
        warrior1,
        warrior2,
        warrior1_id,
        warrior2_id,
        settings,
        icws88,
    }))
}

fn numeric_value(flag: &str, value: Option<OsString>) -> Result<i64, String> {
    let value = value.ok_or_else(|| format!("missing value for {flag}"))?;
    value
        .to_string_lossy()
        .parse::<i64>()
        .map_err(|_| format!("invalid value for {flag}"))
}

fn main() {
    match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{HELP_TEXT}");
        }
        Ok(ParseResult::Args(args)) => {
            let warrior1 = match fs::read_to_string(&args.warrior1) {
                Ok(source) => source,
                Err(error) => {
                    eprintln!("error: cannot read {}: {error}", args.warrior1.display());
                    std::process::exit(1);
                }
            };
            let warrior2 = match fs::read_to_string(&args.warrior2) {
                Ok(source) => source,
                Err(error) => {
                    eprintln!("error: cannot read {}: {error}", args.warrior2.display());
                    std::process::exit(1);
                }
            };

            let report = run_battle(
                &warrior1,
                args.warrior1_id,
                &warrior2,
                args.warrior2_id,
                &args.settings,
                args.icws88,
            );
            println!("{report}");
            if report.starts_with("ERROR:") {
                std::process::exit(1);
            }
        }
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{HELP_TEXT}");
            std::process::exit(2);
        }
    }
}
