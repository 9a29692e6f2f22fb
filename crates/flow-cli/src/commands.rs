use colored::Colorize;
use serde_json::json;

use flow_sdk::{FlowRecord, Flowtrace, TraceConfig, TraceRun};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Trace(args) => cmd_trace(args, &cli.format),
        Command::Show(args) => cmd_show(args, &cli.format),
    }
}

/// Config file (or defaults) with command-line overrides applied.
pub fn build_config(args: &RunArgs) -> anyhow::Result<TraceConfig> {
    let mut config = match &args.config {
        Some(path) => TraceConfig::load(path)?,
        None => TraceConfig::default(),
    };
    if let Some(input) = &args.input {
        config.input = input.clone();
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(dataset) = args.dataset {
        config.dataset = dataset;
    }
    if args.trace_paths {
        config.engine.trace_paths = true;
    }
    Ok(config)
}

fn cmd_trace(args: RunArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let run = Flowtrace::new(config).run()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary(&run))?),
        OutputFormat::Text => print_summary(&run),
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = build_config(&args.run)?;
    let run = Flowtrace::new(config).preview()?;
    match (format, args.store) {
        (OutputFormat::Json, true) => println!("{}", serde_json::to_string_pretty(&run.store)?),
        (OutputFormat::Json, false) => println!("{}", run.report.to_json()?),
        (OutputFormat::Text, true) => print!("{}", run.store),
        (OutputFormat::Text, false) => {
            for record in run.report.records() {
                println!("{}", record_line(record));
            }
            print_summary(&run);
        }
    }
    Ok(())
}

fn summary(run: &TraceRun) -> serde_json::Value {
    json!({
        "dataset": run.dataset,
        "transactions": run.transactions,
        "paths": run.report.path_count(),
        "records": run.report.len(),
        "stats": run.stats,
        "digest": run.digest,
        "written": run.written.as_ref().map(|p| p.display().to_string()),
    })
}

fn print_summary(run: &TraceRun) {
    let stats = &run.stats;
    match &run.written {
        Some(path) => println!(
            "{} Dataset {} traced into {}",
            "✓".green().bold(),
            run.dataset.to_string().bold(),
            path.display().to_string().cyan()
        ),
        None => println!("Dataset {}", run.dataset.to_string().bold()),
    }
    println!(
        "  Transactions: {} ({} dropped)",
        run.transactions,
        stats.dropped().to_string().yellow()
    );
    println!(
        "  Paths: {}, records: {}",
        run.report.path_count().to_string().bold(),
        run.report.len()
    );
    println!(
        "  Matches: {} exact, {} separable, {} splits",
        stats.exact_matches, stats.separable_matches, stats.splits
    );
    if stats.dropped() > 0 {
        println!(
            "  Dropped: {} without candidate, {} over demand",
            stats.dropped_no_candidate, stats.dropped_over_demand
        );
    }
    println!("  Digest: {}", run.digest.dimmed());
}

fn record_line(record: &FlowRecord) -> String {
    let hops: Vec<String> = record
        .slots
        .iter()
        .map(|slot| match slot {
            Some(s) => format!(
                "{} {} @{} {}",
                s.stage.to_string().cyan(),
                s.country.as_str().bold(),
                s.period,
                s.quantity
            ),
            None => "·".dimmed().to_string(),
        })
        .collect();
    format!("{:>6}  {}", record.demand.to_string().yellow(), hops.join("  "))
}
