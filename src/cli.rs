use crate::config::{Config, load_config};
use crate::dataset::{division_chart, division_names, group_summaries, manager_roster, normalize_records};
use crate::error::OrgChartError;
use crate::ir::{EmployeeRecord, GroupedData, Ingested, parse_employees, parse_grouped};
use crate::layout::{compute_chart_layout, compute_group_layouts};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::location::highlight_from_location;
use crate::render::{render_chart_page, render_homepage, render_svg, write_output, write_output_png};
use crate::scene::SceneBuilder;
use crate::theme::Theme;
use crate::render_group_charts;
use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "orgchart", version, about = "Organization chart renderer")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config JSON/JSON5 file (theme, themeVariables, homepage, chart, tooltip)
    #[arg(short = 'c', long = "configFile", global = true)]
    pub config: Option<PathBuf>,

    /// Theme preset (classic, modern)
    #[arg(short = 't', long = "theme", global = true)]
    pub theme: Option<String>,

    /// Log layout details to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Full hierarchy chart
    Chart(ChartArgs),
    /// Per-group mini charts
    Homepage(HomepageArgs),
    /// Manager -> direct reports for a division, as JSON
    Roster(RosterArgs),
    /// Known divisions, as JSON
    Divisions(InputArgs),
}

#[derive(ClapArgs, Debug)]
pub struct InputArgs {
    /// Input JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct OutputArgs {
    /// Output file. Defaults to stdout for SVG/HTML if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Write the computed layout as JSON to this path
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct ChartArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Restrict to one division (group key or CCAR); implies --normalize
    #[arg(short = 'd', long = "division")]
    pub division: Option<String>,

    /// Employee id to highlight
    #[arg(long = "highlight")]
    pub highlight: Option<String>,

    /// Document location to read the `highlight` query parameter from
    #[arg(long = "location", conflicts_with = "highlight")]
    pub location: Option<String>,

    /// Clean up raw report rows before rendering
    #[arg(long = "normalize")]
    pub normalize: bool,
}

#[derive(ClapArgs, Debug)]
pub struct HomepageArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Input is already grouped ({ key: { employees, total_count, employee_ids } })
    #[arg(long = "grouped")]
    pub grouped: bool,
}

#[derive(ClapArgs, Debug)]
pub struct RosterArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Division (group key or CCAR)
    #[arg(short = 'd', long = "division")]
    pub division: String,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Html,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(name) = args.theme.as_deref() {
        config.theme = Theme::by_name(name).ok_or_else(|| OrgChartError::UnknownTheme(name.to_string()))?;
        config.render.background = config.theme.background.clone();
    }

    match args.command {
        Command::Chart(chart) => run_chart(chart, &config),
        Command::Homepage(homepage) => run_homepage(homepage, &config),
        Command::Roster(roster) => {
            let records = normalize_records(read_employees(roster.input.input.as_deref())?);
            let roster_map = manager_roster(&records, &roster.division);
            let json = serde_json::to_string_pretty(&roster_map)?;
            write_output(&json, roster.output.as_deref())
        }
        Command::Divisions(input) => {
            let records = normalize_records(read_employees(input.input.as_deref())?);
            let json = serde_json::to_string_pretty(&division_names(&records))?;
            write_output(&json, None)
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run_chart(args: ChartArgs, config: &Config) -> Result<()> {
    let mut employees = read_employees(args.input.input.as_deref())?;
    if args.normalize || args.division.is_some() {
        employees = normalize_records(employees);
    }
    if let Some(division) = args.division.as_deref() {
        employees = division_chart(&employees, division)?;
    }

    let highlight = args
        .highlight
        .clone()
        .or_else(|| args.location.as_deref().and_then(highlight_from_location));

    let layout = compute_chart_layout(&employees, &config.layout.chart);
    if let Some(path) = args.output.dump_layout.as_deref() {
        write_layout_dump(path, &LayoutDump::from_chart(&layout))?;
    }
    let scene = SceneBuilder::new(config).chart(&layout, highlight.as_deref());

    let title = args.division.as_deref().unwrap_or("Organization chart");
    match args.output.output_format {
        OutputFormat::Svg => write_output(&render_svg(&scene, &config.theme), args.output.output.as_deref()),
        OutputFormat::Html => write_output(
            &render_chart_page(&scene, title, config),
            args.output.output.as_deref(),
        ),
        OutputFormat::Png => {
            let output = ensure_output(&args.output.output, "png")?;
            write_output_png(&render_svg(&scene, &config.theme), &output, &config.render)
        }
    }
}

fn run_homepage(args: HomepageArgs, config: &Config) -> Result<()> {
    let grouped = if args.grouped {
        let input = read_input(args.input.input.as_deref())?;
        let Ingested { data, .. } = parse_grouped(&input)?;
        data
    } else {
        let records = normalize_records(read_employees(args.input.input.as_deref())?);
        group_summaries(&records)
    };

    if let Some(path) = args.output.dump_layout.as_deref() {
        let layouts = compute_group_layouts(&grouped, &config.layout.homepage);
        write_layout_dump(path, &LayoutDump::from_groups(&layouts))?;
    }
    let render = render_group_charts(&grouped, config);

    match args.output.output_format {
        OutputFormat::Html => write_output(&render_homepage(&render, config), args.output.output.as_deref()),
        OutputFormat::Svg => {
            let outputs = resolve_multi_outputs(args.output.output.as_deref(), "svg", &grouped)?;
            for chart in &render.charts {
                let svg = render_svg(&chart.scene, &config.theme);
                match &outputs {
                    Some(paths) => write_output(&svg, Some(&paths[chart.index]))?,
                    None => write_output(&format!("{svg}\n"), None)?,
                }
            }
            Ok(())
        }
        OutputFormat::Png => {
            let base = ensure_output(&args.output.output, "png")?;
            let outputs = resolve_multi_outputs(Some(&base), "png", &grouped)?
                .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
            for chart in &render.charts {
                let svg = render_svg(&chart.scene, &config.theme);
                write_output_png(&svg, &outputs[chart.index], &config.render)?;
            }
            Ok(())
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn read_employees(path: Option<&Path>) -> Result<Vec<EmployeeRecord>> {
    let input = read_input(path)?;
    let Ingested { data, rejected } = parse_employees(&input)?;
    if !rejected.is_empty() {
        tracing::warn!(count = rejected.len(), "skipped rows without an employee id");
    }
    Ok(data)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

/// One file per group key, numbered like the `mini-chart-{n}` surfaces.
fn resolve_multi_outputs(
    output: Option<&Path>,
    ext: &str,
    grouped: &GroupedData,
) -> Result<Option<Vec<PathBuf>>> {
    let Some(base) = output else {
        return Ok(None);
    };
    let count = grouped.len();
    if ends_with_separator(base) && !base.is_dir() {
        std::fs::create_dir_all(base)?;
    }
    if base.is_dir() {
        let outputs = (0..count)
            .map(|idx| base.join(format!("mini-chart-{}.{}", idx + 1, ext)))
            .collect();
        return Ok(Some(outputs));
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("mini-chart");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    let outputs = (0..count)
        .map(|idx| parent.join(format!("{}-{}.{}", stem, idx + 1, ext)))
        .collect();
    Ok(Some(outputs))
}

fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_str()
        .is_some_and(|raw| raw.ends_with('/') || raw.ends_with(std::path::MAIN_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::GroupData;

    #[test]
    fn parses_chart_command() {
        let args = Args::try_parse_from([
            "orgchart",
            "chart",
            "-i",
            "people.json",
            "--location",
            "/chart/Markets?highlight=7",
            "-e",
            "html",
        ])
        .unwrap();
        let Command::Chart(chart) = args.command else {
            panic!("expected chart command");
        };
        assert_eq!(chart.output.output_format, OutputFormat::Html);
        assert_eq!(chart.location.as_deref(), Some("/chart/Markets?highlight=7"));
    }

    #[test]
    fn highlight_and_location_conflict() {
        let parsed = Args::try_parse_from([
            "orgchart",
            "chart",
            "--highlight",
            "1",
            "--location",
            "/?highlight=2",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn multi_outputs_follow_surface_numbering() {
        let mut grouped = GroupedData::new();
        grouped.insert("A".to_string(), GroupData::default());
        grouped.insert("B".to_string(), GroupData::default());
        let outputs = resolve_multi_outputs(Some(Path::new("out/charts.svg")), "svg", &grouped)
            .unwrap()
            .unwrap();
        assert_eq!(outputs[0], Path::new("out/charts-1.svg"));
        assert_eq!(outputs[1], Path::new("out/charts-2.svg"));
        assert!(resolve_multi_outputs(None, "svg", &grouped).unwrap().is_none());
    }

    #[test]
    fn trailing_separator_creates_output_dir() {
        let mut grouped = GroupedData::new();
        grouped.insert("A".to_string(), GroupData::default());
        let dir = std::env::temp_dir().join(format!("orgchart-charts-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let raw = format!("{}/", dir.display());

        let outputs = resolve_multi_outputs(Some(Path::new(&raw)), "svg", &grouped)
            .unwrap()
            .unwrap();
        assert!(dir.is_dir());
        assert_eq!(outputs[0], dir.join("mini-chart-1.svg"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
