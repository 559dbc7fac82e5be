//! Configuration for the ratefile tool.
//!
//! Handles parsing command-line arguments into a resolved `Config`.
//!
//! # Commands
//!
//! - `read`: binary ratefile -> JSON (or printed tables)
//! - `write`: JSON -> binary ratefile
//! - `sample`: generate a random but valid binary ratefile

use std::path::PathBuf;

/// Which operation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Read,
    Write,
    Sample,
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,

    // === Files ===
    /// Input path (ratefile for `read`, JSON for `write`)
    pub input_file: Option<PathBuf>,

    /// Output path; `read` writes JSON to stdout when absent
    pub output_file: Option<PathBuf>,

    // === Sample generation ===
    pub seed: u64,
    pub groups: usize,
    pub prices: usize,

    // === Behavior ===
    /// Print human-readable tables after `read`
    pub print_tables: bool,

    /// Raise the default log level to debug
    pub verbose: bool,

    pub print_config: bool,
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (program name excluded).
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let command = match args.first().map(String::as_str) {
            Some("read") => Command::Read,
            Some("write") => Command::Write,
            Some("sample") => Command::Sample,
            Some("--help") | Some("-h") => {
                print_help();
                std::process::exit(0);
            }
            Some(other) => return Err(format!("unknown command: {}", other)),
            None => return Err("missing command (read, write or sample)".to_string()),
        };

        let mut input_file: Option<PathBuf> = None;
        let mut output_file: Option<PathBuf> = None;
        let mut seed: Option<u64> = None;
        let mut groups: Option<usize> = None;
        let mut prices: Option<usize> = None;
        let mut print_tables = false;
        let mut verbose = false;
        let mut print_config = false;
        let mut print_metrics = true;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--in" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--in requires a path".to_string());
                    }
                    input_file = Some(PathBuf::from(&args[i]));
                }
                "--out" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--out requires a path".to_string());
                    }
                    output_file = Some(PathBuf::from(&args[i]));
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--groups" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--groups requires a number".to_string());
                    }
                    groups = Some(args[i].parse().map_err(|_| "invalid groups")?);
                }
                "--prices" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--prices requires a number".to_string());
                    }
                    prices = Some(args[i].parse().map_err(|_| "invalid prices")?);
                }
                "--tables" => {
                    print_tables = true;
                }
                "--verbose" | "-v" => {
                    verbose = true;
                }
                "--print-config" => {
                    print_config = true;
                }
                "--no-metrics" => {
                    print_metrics = false;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        match command {
            Command::Read | Command::Write if input_file.is_none() => {
                return Err("--in is required".to_string());
            }
            Command::Write | Command::Sample if output_file.is_none() => {
                return Err("--out is required".to_string());
            }
            _ => {}
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        Ok(Config {
            command,
            input_file,
            output_file,
            seed,
            groups: groups.unwrap_or(4),
            prices: prices.unwrap_or(12),
            print_tables,
            verbose,
            print_config,
            print_metrics,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        let show = |p: &Option<PathBuf>| {
            p.as_ref()
                .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
        };

        eprintln!("=== Configuration ===");
        eprintln!("Command:     {:?}", self.command);
        eprintln!("Input file:  {}", show(&self.input_file));
        eprintln!("Output file: {}", show(&self.output_file));
        if self.command == Command::Sample {
            eprintln!();
            eprintln!("Seed:   {}", self.seed);
            eprintln!("Groups: {}", self.groups);
            eprintln!("Prices: {}", self.prices);
        }
        eprintln!();
    }
}

fn print_help() {
    println!("ratefile: read and write call-rating ratefiles");
    println!();
    println!("USAGE:");
    println!("    ratefile <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    read      Decode a binary ratefile to JSON");
    println!("    write     Encode JSON into a binary ratefile");
    println!("    sample    Generate a random valid ratefile");
    println!();
    println!("OPTIONS:");
    println!("    --in <PATH>         Input file (read, write)");
    println!("    --out <PATH>        Output file (read: default stdout)");
    println!("    --tables            Print decoded tables (read)");
    println!();
    println!("    --seed <N>          Random seed (sample, default: time-based)");
    println!("    --groups <N>        NPA groups to generate (sample, default: 4)");
    println!("    --prices <N>        Price bands to generate (sample, default: 12)");
    println!();
    println!("    --verbose, -v       Debug logging (RUST_LOG overrides)");
    println!("    --print-config      Print resolved configuration");
    println!("    --no-metrics        Don't print metrics summary");
    println!("    --help, -h          Print this help");
    println!();
    println!("EXIT STATUS:");
    println!("    0 success, 1 usage or I/O error, 2 file not found, 3 malformed input");
    println!();
    println!("EXAMPLES:");
    println!("    ratefile read --in RATES.R94 --out rates.json");
    println!("    ratefile read --in RATES.R94 --tables");
    println!("    ratefile write --in rates.json --out RATES.R94");
    println!("    ratefile sample --seed 42 --out SAMPLE.R94");
    println!();
}
