//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads settings and the catalog
//! - fetches and prints series
//! - runs the optional AI analysis
//! - writes optional exports

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::analysis::AnalysisClient;
use crate::cli::{Command, FetchArgs, QueryArgs};
use crate::config::Settings;
use crate::data::WorldBankClient;
use crate::domain::{Catalog, SeriesQuery};
use crate::error::AppError;

use self::pipeline::AnalysisPlan;

pub mod pipeline;
pub mod worker;

/// Entry point for the `wbi` binary.
pub fn run() -> Result<(), AppError> {
    let argv = crate::cli::rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal, so only the line-oriented commands log.
    if !matches!(cli.command, Command::Tui(_)) {
        init_tracing(cli.verbose);
    }

    let catalog = Catalog::builtin();
    match cli.command {
        Command::Fetch(args) => handle_fetch(args, &catalog),
        Command::List => {
            print!("{}", format_catalog(&catalog));
            Ok(())
        }
        Command::Tui(args) => {
            let settings = settings_for(&args.query)?;
            let initial = resolve_query(&catalog, &args.query)?;
            crate::tui::run(
                catalog,
                settings,
                initial,
                args.question.unwrap_or_default(),
            )
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "wb_insight=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// A query resolved against the catalog, with the label used for formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub query: SeriesQuery,
    pub indicator_label: String,
}

/// Resolve names to codes. Unknown values are passed through as raw codes, in
/// which case the code doubles as the display label.
pub fn resolve_query(catalog: &Catalog, args: &QueryArgs) -> Result<ResolvedQuery, AppError> {
    pipeline::validate_years(args.start, args.end)?;

    let country = catalog
        .country(&args.country)
        .map(|e| e.code.clone())
        .unwrap_or_else(|| args.country.trim().to_string());
    let (indicator, label) = match catalog.indicator(&args.indicator) {
        Some(e) => (e.code.clone(), e.name.clone()),
        None => (args.indicator.trim().to_string(), args.indicator.trim().to_string()),
    };
    if country.is_empty() || indicator.is_empty() {
        return Err(AppError::usage("Country and indicator must not be empty"));
    }

    Ok(ResolvedQuery {
        query: SeriesQuery::new(country, indicator, args.start, args.end),
        indicator_label: label,
    })
}

/// Environment settings with CLI overrides applied.
pub fn settings_for(args: &QueryArgs) -> Result<Settings, AppError> {
    let mut settings = Settings::from_env()?;
    if let Some(max_tokens) = args.max_tokens {
        settings.generation.max_tokens = max_tokens;
    }
    if let Some(temperature) = args.temperature {
        settings.generation.temperature = temperature;
    }
    if let Some(model_id) = &args.model_id {
        settings.model_id = model_id.clone();
    }
    Ok(settings)
}

fn handle_fetch(args: FetchArgs, catalog: &Catalog) -> Result<(), AppError> {
    let resolved = resolve_query(catalog, &args.query)?;
    let settings = settings_for(&args.query)?;

    let client = WorldBankClient::with_base_url(&settings.worldbank_base_url);
    let analysis = AnalysisClient::connect(&settings);

    info!(
        country = %resolved.query.country,
        indicator = %resolved.query.indicator,
        start = resolved.query.start_year,
        end = resolved.query.end_year,
        "fetching data"
    );
    let output = pipeline::run_fetch(&client, resolved.query, resolved.indicator_label)?;

    println!(
        "{}",
        crate::report::render_series(output.series.as_ref(), &output.indicator_label)
    );

    if let Some(path) = &args.export {
        let series = output.series.clone().unwrap_or_default();
        crate::io::write_series_csv(path, &series, &output.query.indicator)?;
        info!(path = %path.display(), "wrote CSV export");
    }

    match pipeline::plan_analysis(&analysis, &output, args.question.as_deref().unwrap_or("")) {
        AnalysisPlan::Skip => {}
        AnalysisPlan::NotConfigured => {
            println!("AI Analysis:\n{}", pipeline::ANALYSIS_NOT_CONFIGURED);
        }
        AnalysisPlan::NoData => {
            println!("AI Analysis:\n{}", pipeline::NO_DATA_TO_ANALYZE);
        }
        AnalysisPlan::Ask(question) => {
            let answer = pipeline::run_analysis(&analysis, &output, &question)?;
            println!("AI Analysis:\n{answer}");
        }
    }

    Ok(())
}

pub fn format_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    out.push_str("Countries:\n");
    for e in catalog.countries() {
        out.push_str(&format!("  {:<6} {}\n", e.code, e.name));
    }
    out.push_str("\nIndicators:\n");
    for e in catalog.indicators() {
        out.push_str(&format!("  {:<18} {}\n", e.code, e.name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_args(country: &str, indicator: &str, start: i32, end: i32) -> QueryArgs {
        QueryArgs {
            country: country.to_string(),
            indicator: indicator.to_string(),
            start,
            end,
            max_tokens: None,
            temperature: None,
            model_id: None,
        }
    }

    #[test]
    fn resolve_names_to_codes() {
        let catalog = Catalog::builtin();
        let resolved = resolve_query(&catalog, &query_args("United Kingdom", "GDP (current US$)", 2020, 2021)).unwrap();
        assert_eq!(resolved.query, SeriesQuery::new("GBR", "NY.GDP.MKTP.CD", 2020, 2021));
        assert_eq!(resolved.indicator_label, "GDP (current US$)");
    }

    #[test]
    fn resolve_passes_unknown_codes_through() {
        let catalog = Catalog::builtin();
        let resolved = resolve_query(&catalog, &query_args("NOR", "NE.EXP.GNFS.ZS", 2000, 2001)).unwrap();
        assert_eq!(resolved.query.country, "NOR");
        assert_eq!(resolved.query.indicator, "NE.EXP.GNFS.ZS");
        assert_eq!(resolved.indicator_label, "NE.EXP.GNFS.ZS");
    }

    #[test]
    fn resolve_rejects_reversed_years() {
        let catalog = Catalog::builtin();
        let err = resolve_query(&catalog, &query_args("GBR", "SP.POP.TOTL", 2022, 2020)).unwrap_err();
        assert_eq!(err.message(), "Start year must be before end year");
    }

    #[test]
    fn catalog_listing_contains_codes() {
        let listing = format_catalog(&Catalog::builtin());
        assert!(listing.contains("GBR    United Kingdom"));
        assert!(listing.contains("SP.POP.TOTL"));
    }
}
