use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rust_decimal::Decimal;
use scenario_core::models::{EntityType, FilingStatus, TaxpayerProfile};
use scenario_core::{applicable_strategies, calculate_tax_breakdown};
use scenario_rates::RateTableLoader;
use tracing_subscriber::EnvFilter;

/// Compute a full tax breakdown for a taxpayer profile.
///
/// Rate tables are loaded from per-year CSV files in the rates directory:
/// brackets_<year>.csv, deductions_<year>.csv and fica_<year>.csv.
#[derive(Parser, Debug)]
#[command(name = "scenario")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the rate-table CSV files
    #[arg(short, long)]
    rates_dir: PathBuf,

    /// Tax year to load rates for
    #[arg(short, long, default_value_t = 2023)]
    year: i32,

    /// Filing status: single, married_joint, married_separate, head_of_household
    #[arg(short, long, default_value = "single")]
    filing_status: String,

    /// State code (e.g. CA); states without a schedule are treated as no-tax
    #[arg(short, long, default_value = "CA")]
    state: String,

    /// W-2 wage income
    #[arg(long, default_value_t = Decimal::ZERO)]
    wages: Decimal,

    /// Passive income
    #[arg(long, default_value_t = Decimal::ZERO)]
    passive: Decimal,

    /// Unearned income
    #[arg(long, default_value_t = Decimal::ZERO)]
    unearned: Decimal,

    /// Capital gains
    #[arg(long, default_value_t = Decimal::ZERO)]
    capital_gains: Decimal,

    /// Taxpayer owns a business
    #[arg(long, default_value_t = false)]
    business_owner: bool,

    /// Business entity type: llc, s_corp, c_corp, sole_proprietorship, partnership
    #[arg(long)]
    entity_type: Option<String>,

    /// Ordinary K-1 income (requires --business-owner to count)
    #[arg(long)]
    ordinary_k1: Option<Decimal>,

    /// Guaranteed K-1 payments (requires --business-owner to count)
    #[arg(long)]
    guaranteed_k1: Option<Decimal>,

    /// Number of dependents
    #[arg(long, default_value_t = 0)]
    dependents: u32,

    /// Itemized deduction amount; omit to use the standard deduction
    #[arg(long)]
    custom_deduction: Option<Decimal>,

    /// Also list the strategies this profile qualifies for
    #[arg(long, default_value_t = false)]
    list_strategies: bool,
}

fn parse_entity_type(s: &str) -> Result<EntityType> {
    match s {
        "llc" => Ok(EntityType::Llc),
        "s_corp" => Ok(EntityType::SCorp),
        "c_corp" => Ok(EntityType::CCorp),
        "sole_proprietorship" => Ok(EntityType::SoleProprietorship),
        "partnership" => Ok(EntityType::Partnership),
        other => bail!("unknown entity type: {other}"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();

    let Some(filing_status) = FilingStatus::parse(&args.filing_status) else {
        bail!("unknown filing status: {}", args.filing_status);
    };
    let entity_type = args
        .entity_type
        .as_deref()
        .map(parse_entity_type)
        .transpose()?;

    let table = RateTableLoader::load_year(&args.rates_dir, args.year).with_context(|| {
        format!(
            "Failed to load {} rate tables from: {}",
            args.year,
            args.rates_dir.display()
        )
    })?;

    let profile = TaxpayerProfile {
        filing_status,
        state: args.state.clone(),
        uses_standard_deduction: args.custom_deduction.is_none(),
        custom_deduction: args.custom_deduction,
        wages_income: args.wages,
        passive_income: args.passive,
        unearned_income: args.unearned,
        capital_gains: args.capital_gains,
        business_owner: args.business_owner,
        entity_type,
        ordinary_k1_income: args.ordinary_k1,
        guaranteed_k1_income: args.guaranteed_k1,
        dependents: args.dependents,
    };

    let breakdown = calculate_tax_breakdown(Some(&profile), Some(&table), &[]);

    println!(
        "Tax breakdown ({} {} {})",
        args.year,
        profile.filing_status.as_str(),
        args.state
    );
    println!("  Total income:      {}", breakdown.total_income);
    println!("  Deduction applied: {}", breakdown.applied_deduction);
    println!("  Taxable income:    {}", breakdown.taxable_income);
    println!();
    println!("  Federal:           {}", breakdown.federal);
    for slice in &breakdown.federal_brackets {
        let ceiling = slice
            .max
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    {:>6}% on {} ({} to {}): {}",
            slice.rate * Decimal::from(100),
            slice.taxable,
            slice.min,
            ceiling,
            slice.tax
        );
    }
    println!("  State:             {}", breakdown.state);
    println!("  Social security:   {}", breakdown.social_security);
    println!("  Medicare:          {}", breakdown.medicare);
    println!("  Self-employment:   {}", breakdown.self_employment);
    println!();
    println!("  Total tax:         {}", breakdown.total);
    println!("  Effective rate:    {}%", breakdown.effective_rate);

    if args.list_strategies {
        let strategies = applicable_strategies(&profile, &breakdown);
        println!();
        if strategies.is_empty() {
            println!("No applicable strategies.");
        } else {
            println!("Applicable strategies:");
            for strategy in &strategies {
                println!("  {} ({})", strategy.name, strategy.id);
            }
        }
    }

    Ok(())
}
