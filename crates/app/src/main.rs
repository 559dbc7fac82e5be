//! ratefile: convert call-rating ratefiles to and from JSON.
//!
//! # Usage
//! ```text
//! ratefile read --in RATES.R94 [--out rates.json] [--tables]
//! ratefile write --in rates.json --out RATES.R94
//! ratefile sample --out SAMPLE.R94 [--seed N] [--groups N] [--prices N]
//! ```

mod config;
mod report;
mod sample;

use anyhow::{Context, Result};
use config::{Command, Config};
use ratefile_core::{metrics::Metrics, RateFile};
use std::{
    fs,
    io::{self, Write},
    path::Path,
    process::ExitCode,
};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

const EXIT_FAILURE: u8 = 1;
const EXIT_NOT_FOUND: u8 = 2;
const EXIT_MALFORMED: u8 = 3;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run with --help for usage information");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    init_logging(config.verbose);

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Logs go to stderr so JSON on stdout stays clean. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();
}

/// Map the root cause of a failure to the process exit status.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::NotFound {
                return EXIT_NOT_FOUND;
            }
        }
        if cause.downcast_ref::<ratefile_core::Error>().is_some()
            || cause.downcast_ref::<serde_json::Error>().is_some()
        {
            return EXIT_MALFORMED;
        }
    }
    EXIT_FAILURE
}

fn run(config: &Config) -> Result<()> {
    let mut metrics = Metrics::new();

    let show_metrics = match config.command {
        Command::Read => {
            run_read(config, &mut metrics)?;
            config.print_metrics && (config.output_file.is_some() || config.print_tables)
        }
        Command::Write => {
            run_write(config, &mut metrics)?;
            config.print_metrics
        }
        Command::Sample => {
            run_sample(config, &mut metrics)?;
            config.print_metrics
        }
    };

    metrics.complete();
    debug!("{}", metrics.export_text().trim_end().replace('\n', " "));
    if show_metrics {
        metrics.print_summary();
    }
    Ok(())
}

fn run_read(config: &Config, metrics: &mut Metrics) -> Result<()> {
    let input = required(config.input_file.as_deref(), "--in")?;
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let file = RateFile::decode(&bytes).with_context(|| format!("decoding {}", input.display()))?;
    metrics.record(&file, bytes.len());
    info!(
        "decoded {}: {} price bands, {} NPA groups, {} NXX tables",
        input.display(),
        file.price_bands.len(),
        file.npa_groups.len(),
        file.nxx_tables.len()
    );

    if config.print_tables {
        print!("{}", report::render(&file));
    }

    let json = serde_json::to_string_pretty(&file).context("serializing ratefile")?;
    match &config.output_file {
        Some(path) => {
            write_atomic(path, json.as_bytes())?;
            info!("wrote {}", path.display());
        }
        None if !config.print_tables => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
        None => {}
    }
    Ok(())
}

fn run_write(config: &Config, metrics: &mut Metrics) -> Result<()> {
    let input = required(config.input_file.as_deref(), "--in")?;
    let output = required(config.output_file.as_deref(), "--out")?;

    let text = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let file: RateFile =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", input.display()))?;
    let image = file.encode().with_context(|| format!("encoding {}", input.display()))?;
    metrics.record(&file, image.len());

    write_atomic(output, &image)?;
    info!("wrote {} ({} bytes)", output.display(), image.len());
    Ok(())
}

fn run_sample(config: &Config, metrics: &mut Metrics) -> Result<()> {
    let output = required(config.output_file.as_deref(), "--out")?;

    let file = sample::generate_rate_file(config.seed, config.groups, config.prices)
        .context("generating sample ratefile")?;
    let image = file.encode().context("encoding sample ratefile")?;
    metrics.record(&file, image.len());

    write_atomic(output, &image)?;
    info!("wrote sample {} (seed {})", output.display(), config.seed);
    Ok(())
}

fn required<'a>(path: Option<&'a Path>, flag: &str) -> Result<&'a Path> {
    path.with_context(|| format!("{} is required", flag))
}

/// Write `data` to `path` through a temporary file in the same directory,
/// so the destination is either untouched or complete.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    tmp.write_all(data)
        .with_context(|| format!("writing {}", path.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(command: Command, input: Option<PathBuf>, output: Option<PathBuf>) -> Config {
        Config {
            command,
            input_file: input,
            output_file: output,
            seed: 42,
            groups: 3,
            prices: 10,
            print_tables: false,
            verbose: false,
            print_config: false,
            print_metrics: false,
        }
    }

    #[test]
    fn test_sample_read_write_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("SAMPLE.R94");
        let json = dir.path().join("sample.json");
        let rebuilt = dir.path().join("REBUILT.R94");

        run(&config(Command::Sample, None, Some(bin.clone()))).unwrap();
        run(&config(Command::Read, Some(bin.clone()), Some(json.clone()))).unwrap();
        run(&config(Command::Write, Some(json), Some(rebuilt.clone()))).unwrap();

        assert_eq!(fs::read(&bin).unwrap(), fs::read(&rebuilt).unwrap());
    }

    #[test]
    fn test_failed_write_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("bad.json");
        let out = dir.path().join("OUT.R94");

        let mut file = sample::generate_rate_file(1, 1, 1).unwrap();
        file.header.description = "x".repeat(300);
        fs::write(&json, serde_json::to_string(&file).unwrap()).unwrap();

        let err = run(&config(Command::Write, Some(json), Some(out.clone()))).unwrap_err();
        assert_eq!(exit_code(&err), EXIT_MALFORMED);
        assert!(!out.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.r94");
        let err = run(&config(Command::Read, Some(missing), None)).unwrap_err();
        assert_eq!(exit_code(&err), EXIT_NOT_FOUND);

        let garbage = dir.path().join("garbage.r94");
        fs::write(&garbage, [0u8; 10]).unwrap();
        let err = run(&config(Command::Read, Some(garbage), None)).unwrap_err();
        assert_eq!(exit_code(&err), EXIT_MALFORMED);

        let not_json = dir.path().join("not.json");
        fs::write(&not_json, "{").unwrap();
        let out = dir.path().join("out.r94");
        let err = run(&config(Command::Write, Some(not_json), Some(out))).unwrap_err();
        assert_eq!(exit_code(&err), EXIT_MALFORMED);

        assert_eq!(exit_code(&anyhow::anyhow!("other")), EXIT_FAILURE);
    }
}
