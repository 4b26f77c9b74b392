use crate::config::load_config;
use crate::gedcom::parse_gedcom;
use crate::layout::{LayoutMode, compute_layout};
use crate::render::{render_svg, write_output_svg};
use crate::snapshot::{ComputeResult, build_graph, parse_request};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "fatlas", version, about = "Family tree layout engine (block partition)")]
pub struct Args {
    /// Input file (.json snapshot or .ged) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Layout mode: vertical, horizontal, circular, or fan. Overrides the
    /// snapshot's own mode; unknown values fall back to vertical.
    #[arg(short = 'm', long = "mode")]
    pub mode: Option<String>,

    /// Config JSON file (card dimensions, gaps, theme)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Svg,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let (input, is_gedcom) = read_input(args.input.as_deref())?;

    let (graph, snapshot_mode) = if is_gedcom {
        (parse_gedcom(&input)?, None)
    } else {
        let request = parse_request(&input)?;
        let mode = request.mode.clone();
        (build_graph(&request.nodes, &request.edges), mode)
    };

    let mode = args
        .mode
        .or(snapshot_mode)
        .map(|token| LayoutMode::from_token(&token))
        .unwrap_or_default();

    let layout = compute_layout(&graph, mode, &config.layout);

    match args.format {
        OutputFormat::Json => {
            let result = ComputeResult::from_layout(&layout);
            let encoded = serde_json::to_string_pretty(&result)?;
            write_output(&encoded, args.output.as_deref())?;
        }
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config);
            write_output_svg(&svg, args.output.as_deref())?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, false));
        }
        let content = std::fs::read_to_string(path)?;
        let is_ged = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("ged"))
            .unwrap_or(false);
        return Ok((content, is_ged));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, false))
}

fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
