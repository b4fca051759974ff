//! PremiumLens CLI
//!
//! Loads listing CSVs, splits every group at its rating split point, prints
//! premium summaries and writes bar charts.

use anyhow::{Context, Result};
use clap::Parser;
use premiumlens::config::DEFAULT_CONFIG_FILE;
use premiumlens::{
    aggregate_premium, combine_csv, compare_premium, report, split_data, Args, Config,
};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let args = Args::parse();

    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };
    config.merge_with_args(&args);
    debug!("Configuration: {:?}", config);

    run_pipeline(&args, &config)
}

fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Logging was already initialised");
    }
}

/// Write a default premiumlens.toml
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if path.exists() {
        anyhow::bail!("{} already exists. Remove it first or edit it manually.", DEFAULT_CONFIG_FILE);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;
    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

fn run_pipeline(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Load and combine data
    let table = combine_csv(args.inputs.as_slice(), &config.combine_options())
        .context("Failed to load listing data")?;
    info!("Loaded {} listings from {} file(s)", table.len(), args.inputs.len());

    // Step 2: Split every group at its split point
    let columns = config.split_columns();
    let partition = split_data(&table, &columns, config.split.mode)
        .context("Failed to split listings")?;
    info!("{}", report::split_overview(&partition));

    // Step 3: Summaries per grouping column
    for group_col in &config.report.group_by {
        let summaries = aggregate_premium(group_col, &partition.above, &partition.below)?;
        let ranking = compare_premium(group_col, &partition.above, &partition.below)?;

        println!("\n=== Premium/discount by {} ===", group_col);
        print!("{}", report::premium_table(group_col, &summaries));
        println!("\n=== Relative premium by {} ===", group_col);
        print!("{}", report::comparison_table(group_col, &ranking));

        if config.report.plot {
            render_charts(config, &columns.split, group_col, &summaries, &ranking)?;
        }
    }

    info!("Finished in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

#[cfg(feature = "plot")]
fn render_charts(
    config: &Config,
    split_col: &str,
    group_col: &str,
    summaries: &[premiumlens::PremiumSummary],
    ranking: &[premiumlens::RelativePremium],
) -> Result<()> {
    use premiumlens::{comparison_chart, premium_chart, ChartLabels, PlottersRenderer, Renderer};

    let renderer = PlottersRenderer::default();
    let dir = &config.report.output_dir;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let labels = ChartLabels::new(
        format!("Premium/discount by {}", group_col),
        group_col,
        "Premium/Discount",
    );
    let chart = premium_chart(
        summaries,
        &config.report.above_label,
        &config.report.below_label,
        &labels,
    );
    renderer.render(&chart, &dir.join(format!("premium_by_{}.png", group_col)))?;

    let labels = ChartLabels::new(
        format!("Price of listings above vs below mean {} by {}", split_col, group_col),
        group_col,
        "Relative premium",
    );
    let chart = comparison_chart(ranking, &labels);
    renderer.render(&chart, &dir.join(format!("compare_by_{}.png", group_col)))?;

    Ok(())
}

#[cfg(not(feature = "plot"))]
fn render_charts(
    _config: &Config,
    _split_col: &str,
    group_col: &str,
    _summaries: &[premiumlens::PremiumSummary],
    _ranking: &[premiumlens::RelativePremium],
) -> Result<()> {
    tracing::warn!("Built without the `plot` feature; no charts for {}", group_col);
    Ok(())
}
