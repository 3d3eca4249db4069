use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use state_scatter::config::ChartConfig;
use state_scatter::view::{ChartLayout, Margin};
use state_scatter::viz::RenderOptions;
use state_scatter::{AxisSelection, StateRecord, ViewModel, XField, YField};
use state_scatter::{stats, storage, viz};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "statescatter",
    version,
    about = "Chart & summarize U.S. state health and demographic statistics"
)]
struct Cli {
    /// JSON config file (data path, size, initial axes, locale).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// State CSV (default: assets/data/stateData.csv).
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the scatterplot to .svg or .png.
    Render(RenderArgs),
    /// Print the tooltip text for one or all states.
    Tooltip(TooltipArgs),
    /// Print summary statistics for every numeric column.
    Stats,
    /// Write the coerced records as CSV or JSON.
    Export(ExportArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct AxisArgs {
    /// Field on the X axis: poverty, age or income.
    #[arg(long)]
    x: Option<XField>,
    /// Field on the Y axis: healthcare, smokes or obesity.
    #[arg(long)]
    y: Option<YField>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output path (.svg or .png).
    #[arg(long)]
    out: PathBuf,
    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,
    #[command(flatten)]
    axes: AxisArgs,
    /// Draw the static poverty/healthcare chart instead of the interactive one.
    #[arg(long = "static", default_value_t = false, conflicts_with_all = ["x", "y"])]
    fixed: bool,
    /// Show the tooltip of this state (abbreviation, e.g. TX).
    #[arg(long)]
    highlight: Option<String>,
    /// Locale for tick labels (en, de, fr, ...).
    #[arg(long)]
    locale: Option<String>,
}

#[derive(Args, Debug)]
struct TooltipArgs {
    /// State abbreviation; all states when omitted.
    #[arg(long)]
    state: Option<String>,
    #[command(flatten)]
    axes: AxisArgs,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Output path.
    #[arg(long)]
    out: PathBuf,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn find_state(records: &[StateRecord], abbr: &str) -> Result<usize> {
    records
        .iter()
        .position(|r| r.abbr.eq_ignore_ascii_case(abbr.trim()))
        .ok_or_else(|| anyhow::anyhow!("no state with abbreviation {abbr:?}"))
}

fn selection(cfg: &ChartConfig, axes: &AxisArgs) -> AxisSelection {
    AxisSelection::new(
        axes.x.unwrap_or(cfg.selection.x),
        axes.y.unwrap_or(cfg.selection.y),
    )
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut cfg = ChartConfig::load_or_default(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        cfg.data = data;
    }
    let records = storage::load_csv(&cfg.data)?;

    match cli.cmd {
        Command::Render(args) => cmd_render(&records, cfg, args),
        Command::Tooltip(args) => cmd_tooltip(&records, &cfg, args),
        Command::Stats => cmd_stats(&records),
        Command::Export(args) => cmd_export(&records, args),
    }
}

fn cmd_render(records: &[StateRecord], mut cfg: ChartConfig, args: RenderArgs) -> Result<()> {
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    if let Some(l) = args.locale {
        cfg.locale = l;
    }

    let view = if args.fixed {
        let layout = ChartLayout::new(cfg.width as f64, cfg.height as f64, Margin::STATIC);
        ViewModel::fixed(records, layout)?
    } else {
        let layout = ChartLayout::new(cfg.width as f64, cfg.height as f64, Margin::INTERACTIVE);
        ViewModel::interactive(records, layout, selection(&cfg, &args.axes))?
    };
    let highlight = args
        .highlight
        .as_deref()
        .map(|abbr| find_state(records, abbr))
        .transpose()?;

    let opts = RenderOptions {
        locale: cfg.locale,
        highlight,
    };
    viz::render_chart(records, &view, &args.out, &opts)?;
    info!("rendered {} vs {}", view.selection.x, view.selection.y);
    eprintln!("Wrote plot to {}", args.out.display());
    Ok(())
}

fn cmd_tooltip(records: &[StateRecord], cfg: &ChartConfig, args: TooltipArgs) -> Result<()> {
    let layout = ChartLayout::new(cfg.width as f64, cfg.height as f64, Margin::INTERACTIVE);
    let view = ViewModel::interactive(records, layout, selection(cfg, &args.axes))?;
    match args.state.as_deref() {
        Some(abbr) => {
            let idx = find_state(records, abbr)?;
            println!("{}", view.tooltip(&records[idx]));
        }
        None => {
            for r in records {
                println!("{}\n", view.tooltip(r));
            }
        }
    }
    Ok(())
}

fn cmd_stats(records: &[StateRecord]) -> Result<()> {
    for s in stats::field_summary(records) {
        println!(
            "{:<10}  count={}  min={} max={} mean={} median={}",
            s.field,
            s.count,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }
    Ok(())
}

fn cmd_export(records: &[StateRecord], args: ExportArgs) -> Result<()> {
    let path = &args.out;
    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(records, path)?,
        "json" => storage::save_json(records, path)?,
        other => bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", records.len(), path.display());
    Ok(())
}
