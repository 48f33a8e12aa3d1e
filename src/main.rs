use hex_mosaic as hex;
use hex::{
    color::ColorName,
    geometry::GridSpec,
    prompt::{Answers, Prompter},
    tessellation::PlacementMode,
};
use clap::Parser;
use log::error;
use std::process::ExitCode;

/// Draws a honeycomb mosaic in two colors
#[derive(Parser, Debug)]
#[command(name = "hex_mosaic")]
#[command(version, about, long_about = None)]
struct Args {
    /// First color, asked for if missing
    #[arg(long, value_parser = parse_color)]
    first: Option<ColorName>,

    /// Second color, asked for if missing
    #[arg(long, value_parser = parse_color)]
    second: Option<ColorName>,

    /// How the colors are placed, asked for if missing
    #[arg(long, value_enum)]
    placement: Option<PlacementMode>,

    /// Number of hexagons in a row, asked for if missing
    #[arg(long, value_parser = parse_grid)]
    count: Option<GridSpec>,
}

fn parse_color(value: &str) -> Result<ColorName, String> {
    hex::locale::resolve_color(value).ok_or_else(|| format!("unknown color {:?}", value))
}

fn parse_grid(value: &str) -> Result<GridSpec, String> {
    let count = value.parse::<usize>().map_err(|e| e.to_string())?;
    GridSpec::new(count).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    println!("{}", hex::locale::HEADING);

    let answers = Answers {
        first: args.first,
        second: args.second,
        placement: args.placement,
        grid: args.count,
    };
    let config = match answers.complete(&mut Prompter::stdio()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Run the application
    match pollster::block_on(hex::application::run(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
