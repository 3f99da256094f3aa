use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use hist2d::{histogram_file, OutputFormat, PointTrack, BOX, CSV_FILE};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

struct Options {
    input: PathBuf,
    size: usize,
    format: OutputFormat,
    output: Option<PathBuf>,
    header: bool,
}

fn cli() -> Command {
    Command::new("hist2d")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Counts x,y points from a CSV file into a square occupancy grid")
        .arg(
            Arg::new("input")
                .value_name("INPUT_FILE")
                .help("Headerless x,y,z CSV file (.gz, .zst and .zip are decompressed)")
                .default_value(CSV_FILE)
        )
        .arg(
            Arg::new("box")
                .short('b')
                .long("box")
                .value_name("N")
                .help("Number of cells per axis [default: 10]")
                .value_parser(clap::value_parser!(usize))
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Grid text layout")
                .value_parser(["array", "plain"])
                .default_value("array")
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT_FILE")
                .help("Write the grid to this file instead of stdout")
        )
        .arg(
            Arg::new("header")
                .long("header")
                .help("Skip the first line of the input")
                .action(ArgAction::SetTrue)
        )
}

fn options(matches: &clap::ArgMatches) -> Result<Options> {
    let format = matches
        .get_one::<String>("format")
        .map(|s| OutputFormat::from_str(s))
        .transpose()?
        .unwrap_or_default();

    Ok(Options {
        input: matches
            .get_one::<String>("input")
            .map(PathBuf::from)
            .unwrap_or_else(|| CSV_FILE.into()),
        size: matches.get_one::<usize>("box").copied().unwrap_or(BOX),
        format,
        output: matches.get_one::<String>("output").map(PathBuf::from),
        header: matches.get_flag("header"),
    })
}

fn run(opts: &Options) -> Result<()> {
    let start = Instant::now();

    let track = PointTrack::new(&opts.input)
        .with_context(|| format!("Failed to open input file: {}", opts.input.display()))?
        .with_header(opts.header);
    log::info!("Reading points from {}", track.path().display());

    let hist = histogram_file(&track, opts.size)
        .with_context(|| format!("Failed to build histogram from {}", opts.input.display()))?;
    let summary = hist.summary;
    log::info!(
        "{} records, {} counted, {} outside the {}x{} grid",
        summary.records,
        summary.counted,
        summary.dropped,
        opts.size,
        opts.size
    );

    let text = hist.grid.render(opts.format);
    match &opts.output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            file.write_all(text.as_bytes())?;
            log::info!("Grid written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }

    log::info!("Histogramming complete in {:.4} seconds", start.elapsed().as_secs_f64());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let matches = cli().get_matches();
    run(&options(&matches)?)
}
