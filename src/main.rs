use clap::{Parser, Subcommand};
use imgscript::config::{self, CONFIG_FILE};
use imgscript::imaging::{Histogram, ImageBackend};
use imgscript::output;
use imgscript::script::{self, Session};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Registry name used by the one-shot `apply` command.
const APPLY_NAME: &str = "img";

#[derive(Parser)]
#[command(name = "imgscript")]
#[command(about = "Scriptable image editor for PPM, PNG, JPEG and BMP")]
#[command(long_about = "\
Scriptable image editor for PPM, PNG, JPEG and BMP

Images are loaded into a registry under a name, transformed into new names,
and saved. Format is chosen by file extension.

Script example:

  # comments and blank lines are skipped
  load images/koala.ppm koala
  brighten 10 koala koala-bright
  horizontal-flip koala koala-flipped
  sepia koala koala-sepia
  save out/koala-sepia.png koala-sepia
  q

Transforms: red-component green-component blue-component intensity luma
value horizontal-flip vertical-flip brighten sepia greyscale blur sharpen

Run 'imgscript gen-config' to generate a documented imgscript.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a script file, then exit
    Run {
        /// Script file, one instruction per line
        script: PathBuf,
    },
    /// Interactive mode: read instructions from stdin
    Repl,
    /// Apply one transform to a file
    Apply {
        /// Transform verb, e.g. sepia or brighten
        verb: String,
        /// Verb parameters (the increment for brighten)
        #[arg(allow_negative_numbers = true)]
        params: Vec<String>,
        /// Input image
        #[arg(long, short)]
        input: PathBuf,
        /// Output image
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Print channel histograms of an image
    Histogram {
        path: PathBuf,
        /// Emit the full 256-bucket tables as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock imgscript.toml with all options documented
    GenConfig,
}

#[derive(Serialize)]
struct HistogramReport<'a> {
    path: &'a Path,
    width: usize,
    height: usize,
    histogram: &'a Histogram,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.config)?;
    tracing::debug!(path = %cli.config.display(), ?config, "config loaded");

    match cli.command {
        Command::Run { script } => {
            let input = BufReader::new(File::open(&script)?);
            let mut session = Session::new(config.registry()).with_echo(config.script.echo);
            let summary = session.run(input, io::stdout().lock(), false)?;
            output::print_run_summary(&summary);
            if summary.failed > 0 {
                return Err(format!(
                    "{} of {} commands in {} failed",
                    summary.failed,
                    summary.executed,
                    script.display()
                )
                .into());
            }
        }
        Command::Repl => {
            let mut session = Session::new(config.registry()).with_echo(config.script.echo);
            session.run(io::stdin().lock(), io::stdout().lock(), true)?;
        }
        Command::Apply {
            verb,
            params,
            input,
            output,
        } => {
            let mut registry = config.registry();
            registry.load(&input, APPLY_NAME)?;
            let args: Vec<&str> = params
                .iter()
                .map(String::as_str)
                .chain([APPLY_NAME, APPLY_NAME])
                .collect();
            let command = script::parse_command(&verb, &args)?;
            command.execute(&mut registry)?;
            registry.save(&output, APPLY_NAME)?;
            println!("{} {} → {}", command.operation, input.display(), output.display());
        }
        Command::Histogram { path, json } => {
            let image = config.backend().decode(&path)?;
            let histogram = image.histogram();
            if json {
                let report = HistogramReport {
                    path: &path,
                    width: image.width(),
                    height: image.height(),
                    histogram: &histogram,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                output::print_histogram(&name, &image, &histogram);
            }
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// Level is `warn`, or `debug` with `--verbose`; `RUST_LOG` wins when set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "imgscript=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
