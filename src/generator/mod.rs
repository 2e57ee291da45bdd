//! Synthetic Opportunity Generator
//!
//! Produces independent pipeline-opportunity records from a single seeded
//! ChaCha8 stream. Each record consumes draws in a fixed order:
//!
//! 1. creation offset within the window
//! 2. sales-cycle length
//! 3. region, product, channel
//! 4. sales stage
//! 5. deal size
//! 6. marketing program
//!
//! Identical `(n_opportunities, seed, start_date)` therefore reproduce the
//! same records and a byte-identical export. Generation is strictly
//! sequential; the stream is never shared or split.

pub mod config;
pub mod sampler;

pub use config::{parse_start_date, DealSizeParams, GeneratorConfig};
pub use sampler::DiscreteSampler;

use std::path::Path;

use chrono::{Datelike, Days};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use statrs::distribution::LogNormal;
use tracing::{debug, info};

use crate::dataset;
use crate::error::{ConfigError, GenerateError};
use crate::format::format_usd;
use crate::opportunity::{
    quarter_of, round_cents, Channel, MarketingProgram, Opportunity, Product, Region, SalesStage,
};
use config::{CREATION_WINDOW_DAYS, MAX_CYCLE_DAYS, MIN_CYCLE_DAYS};

/// Stage weights in canonical stage order.
pub const STAGE_WEIGHTS: [(SalesStage, u32); 6] = [
    (SalesStage::Prospecting, 15),
    (SalesStage::Qualification, 20),
    (SalesStage::Proposal, 25),
    (SalesStage::Negotiation, 20),
    (SalesStage::ClosedWon, 15),
    (SalesStage::ClosedLost, 5),
];

/// Seeded generator of opportunity records.
pub struct OpportunityGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
    stages: DiscreteSampler<SalesStage>,
    deal_size: LogNormal,
    next_index: usize,
}

impl OpportunityGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let deal_size = LogNormal::new(config.deal_size.location, config.deal_size.scale)
            .map_err(|e| ConfigError::Parse(format!("deal_size: {}", e)))?;

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            stages: DiscreteSampler::new(&STAGE_WEIGHTS),
            deal_size,
            next_index: 0,
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Draw the next record from the stream.
    pub fn next_opportunity(&mut self) -> Opportunity {
        let index = self.next_index;
        self.next_index += 1;

        let created_offset = self.rng.gen_range(0..CREATION_WINDOW_DAYS);
        let cycle_days = self.rng.gen_range(MIN_CYCLE_DAYS..=MAX_CYCLE_DAYS);
        let created_date = self.config.start_date + Days::new(created_offset);
        let close_date = created_date + Days::new(cycle_days);

        let region = pick(&mut self.rng, Region::ALL);
        let product = pick(&mut self.rng, Product::ALL);
        let channel = pick(&mut self.rng, Channel::ALL);
        let sales_stage = self.stages.sample(&mut self.rng);
        let deal_size = self.rng.sample(&self.deal_size);
        let marketing_program = pick(&mut self.rng, MarketingProgram::ALL);

        let probability = sales_stage.probability();
        let expected = deal_size * (probability as f64 / 100.0);
        // In-flight stages report expected value as actual.
        let actual = if sales_stage.is_won() {
            deal_size
        } else if sales_stage.is_lost() {
            0.0
        } else {
            expected
        };

        Opportunity {
            id: Opportunity::format_id(index),
            created_date,
            close_date,
            region,
            product,
            channel,
            sales_stage,
            deal_size: round_cents(deal_size),
            probability,
            expected_revenue: round_cents(expected),
            actual_revenue: round_cents(actual),
            marketing_program,
            quarter: quarter_of(created_date),
            month: created_date.month(),
        }
    }

    /// Generate `n_opportunities` records in order.
    pub fn generate(&mut self) -> Vec<Opportunity> {
        let n = self.config.n_opportunities;
        let mut records = Vec::with_capacity(n);
        for _ in 0..n {
            records.push(self.next_opportunity());
        }
        debug!(count = records.len(), seed = self.config.seed, "generated opportunities");
        records
    }
}

fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

/// Generate records for `config` without writing them.
pub fn generate_opportunities(config: &GeneratorConfig) -> Result<Vec<Opportunity>, ConfigError> {
    Ok(OpportunityGenerator::new(config.clone())?.generate())
}

/// Run one generation pass and write the export to `output`.
///
/// Nothing is written when the config is invalid.
pub fn generate_dataset(
    config: &GeneratorConfig,
    output: impl AsRef<Path>,
) -> Result<GenerationSummary, GenerateError> {
    let output = output.as_ref();
    info!(
        n_opportunities = config.n_opportunities,
        seed = config.seed,
        start_date = %config.start_date,
        "generating opportunity dataset"
    );

    let records = generate_opportunities(config)?;
    dataset::write_csv_file(output, &records)?;

    let summary = GenerationSummary::from_records(&records);
    info!(
        path = %output.display(),
        count = summary.count,
        total_pipeline = summary.total_pipeline,
        "dataset written"
    );
    Ok(summary)
}

/// Totals reported after a generation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSummary {
    pub count: usize,
    pub total_pipeline: f64,
    pub expected_revenue: f64,
    pub actual_revenue: f64,
}

impl GenerationSummary {
    pub fn from_records(records: &[Opportunity]) -> Self {
        Self {
            count: records.len(),
            total_pipeline: records.iter().map(|r| r.deal_size).sum(),
            expected_revenue: records.iter().map(|r| r.expected_revenue).sum(),
            actual_revenue: records.iter().map(|r| r.actual_revenue).sum(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "✓ Generated {} opportunities\n\
             ✓ Total Pipeline: {}\n\
             ✓ Expected Revenue: {}\n\
             ✓ Actual Revenue: {}\n",
            self.count,
            format_usd(self.total_pipeline),
            format_usd(self.expected_revenue),
            format_usd(self.actual_revenue),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config(n: usize) -> GeneratorConfig {
        GeneratorConfig {
            n_opportunities: n,
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_count_is_config_error() {
        assert!(matches!(
            OpportunityGenerator::new(config(0)),
            Err(ConfigError::ZeroOpportunities)
        ));
    }

    #[test]
    fn test_ids_are_sequential() {
        let records = generate_opportunities(&config(12)).unwrap();
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.id, format!("OPP_{:05}", i));
        }
    }

    #[test]
    fn test_same_seed_same_records() {
        let a = generate_opportunities(&config(200)).unwrap();
        let b = generate_opportunities(&config(200)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_differs() {
        let a = generate_opportunities(&config(50)).unwrap();
        let b = generate_opportunities(&GeneratorConfig {
            seed: 7,
            ..config(50)
        })
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_prefix_stable_across_counts() {
        // Records never depend on later records.
        let short = generate_opportunities(&config(10)).unwrap();
        let long = generate_opportunities(&config(100)).unwrap();
        assert_eq!(short[..], long[..10]);
    }

    #[test]
    fn test_revenue_rules_hold() {
        for r in generate_opportunities(&config(3000)).unwrap() {
            assert!(r.probability <= 100);
            assert!(r.deal_size > 0.0);
            match r.sales_stage {
                SalesStage::ClosedWon => {
                    assert_eq!(r.probability, 100);
                    assert!((r.actual_revenue - r.deal_size).abs() <= 0.01);
                }
                SalesStage::ClosedLost => {
                    assert_eq!(r.probability, 0);
                    assert_eq!(r.actual_revenue, 0.0);
                    assert_eq!(r.expected_revenue, 0.0);
                }
                stage => {
                    assert_eq!(r.probability, stage.probability());
                    assert_eq!(r.actual_revenue, r.expected_revenue);
                    let implied = r.deal_size * r.probability as f64 / 100.0;
                    assert!((r.expected_revenue - implied).abs() <= 0.01);
                }
            }
        }
    }

    #[test]
    fn test_dates_within_window_and_cycle() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        for r in generate_opportunities(&config(3000)).unwrap() {
            assert!(r.created_date >= start && r.created_date <= end);
            assert!(r.close_date > r.created_date);
            assert!((30..=180).contains(&r.cycle_days()));
            assert_eq!(r.month, r.created_date.month());
            assert_eq!(r.quarter, (r.month - 1) / 3 + 1);
        }
    }

    #[test]
    fn test_custom_start_date_shifts_window() {
        let start = NaiveDate::from_ymd_opt(2021, 6, 15).unwrap();
        let records = generate_opportunities(&GeneratorConfig {
            start_date: start,
            ..config(500)
        })
        .unwrap();
        assert!(records.iter().all(|r| r.created_date >= start));
        assert!(records
            .iter()
            .all(|r| (r.created_date - start).num_days() < 365));
    }

    #[test]
    fn test_stage_mix_follows_weights() {
        let records = generate_opportunities(&config(20_000)).unwrap();
        for (stage, weight) in STAGE_WEIGHTS {
            let share = records.iter().filter(|r| r.sales_stage == stage).count() as f64
                / records.len() as f64;
            assert!(
                (share - weight as f64 / 100.0).abs() < 0.02,
                "{} share {:.3}",
                stage,
                share
            );
        }
    }

    #[test]
    fn test_deal_size_is_heavy_tailed() {
        let records = generate_opportunities(&config(5000)).unwrap();
        let mut sizes: Vec<f64> = records.iter().map(|r| r.deal_size).collect();
        sizes.sort_by(|a, b| b.partial_cmp(a).unwrap());
        let total: f64 = sizes.iter().sum();
        let top_decile: f64 = sizes[..sizes.len() / 10].iter().sum();
        // Top 10% of deals carry roughly 58% of the pipeline for sigma = 1.5.
        assert!(top_decile / total > 0.4, "top decile share {}", top_decile / total);

        let mut sorted = sizes.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let median = sorted[sorted.len() / 2];
        // Median of LogNormal(10, 1.5) is e^10.
        assert!((median / 10f64.exp() - 1.0).abs() < 0.15, "median {}", median);
    }

    #[test]
    fn test_summary_totals() {
        let records = generate_opportunities(&config(100)).unwrap();
        let summary = GenerationSummary::from_records(&records);
        assert_eq!(summary.count, 100);
        assert!(summary.total_pipeline >= summary.expected_revenue);
        assert!(summary.total_pipeline >= summary.actual_revenue);
        assert!(summary.render().contains("Generated 100 opportunities"));
    }
}
