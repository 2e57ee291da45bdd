//! Pipeline Dashboard
//!
//! Aggregates an opportunity dataset into the six dashboard panels and an
//! executive summary. Pure function of the records; nothing feeds back into
//! generation.
//!
//! Grouping uses ordered maps keyed by the categorical enums, so panel order
//! is deterministic even when revenue totals tie.

pub mod report;

pub use report::{DashboardReport, ExecutiveSummary};

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::opportunity::{Channel, MarketingProgram, Opportunity, Product, Region, SalesStage};

/// Actual revenue for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRevenue {
    pub region: Region,
    pub revenue: f64,
    /// Above the mean of all regional totals.
    pub above_mean: bool,
}

/// Total deal size sitting in one stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagePipeline {
    pub stage: SalesStage,
    pub pipeline: f64,
}

/// Revenue for opportunities created in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub month: u32,
    pub actual_revenue: f64,
    pub expected_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelPerformance {
    pub channel: Channel,
    pub deals: usize,
    pub revenue: f64,
    /// Actual revenue divided by deal count.
    pub avg_revenue_per_deal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRevenue {
    pub product: Product,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramRevenue {
    pub program: MarketingProgram,
    pub revenue: f64,
}

/// Revenue by region, ascending.
pub fn revenue_by_region(records: &[Opportunity]) -> Vec<RegionRevenue> {
    let totals = sum_by(records, |r| r.region, |r| r.actual_revenue);
    let mean = if totals.is_empty() {
        0.0
    } else {
        totals.values().mean()
    };

    let mut panel: Vec<RegionRevenue> = totals
        .into_iter()
        .map(|(region, revenue)| RegionRevenue {
            region,
            revenue,
            above_mean: revenue > mean,
        })
        .collect();
    panel.sort_by(|a, b| a.revenue.total_cmp(&b.revenue));
    panel
}

/// Pipeline by stage in canonical stage order. Every stage is present.
pub fn pipeline_by_stage(records: &[Opportunity]) -> Vec<StagePipeline> {
    let totals = sum_by(records, |r| r.sales_stage, |r| r.deal_size);
    SalesStage::ALL
        .iter()
        .map(|&stage| StagePipeline {
            stage,
            pipeline: totals.get(&stage).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Actual and expected revenue per creation month, ascending by month.
pub fn monthly_trend(records: &[Opportunity]) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<u32, (f64, f64)> = BTreeMap::new();
    for r in records {
        let entry = months.entry(r.created_date.month()).or_default();
        entry.0 += r.actual_revenue;
        entry.1 += r.expected_revenue;
    }
    months
        .into_iter()
        .map(|(month, (actual_revenue, expected_revenue))| MonthlyRevenue {
            month,
            actual_revenue,
            expected_revenue,
        })
        .collect()
}

/// Deal count and revenue per channel, in channel order.
pub fn channel_performance(records: &[Opportunity]) -> Vec<ChannelPerformance> {
    let mut channels: BTreeMap<Channel, (usize, f64)> = BTreeMap::new();
    for r in records {
        let entry = channels.entry(r.channel).or_default();
        entry.0 += 1;
        entry.1 += r.actual_revenue;
    }
    channels
        .into_iter()
        .map(|(channel, (deals, revenue))| ChannelPerformance {
            channel,
            deals,
            revenue,
            avg_revenue_per_deal: revenue / deals as f64,
        })
        .collect()
}

/// Revenue by product, ascending.
pub fn product_mix(records: &[Opportunity]) -> Vec<ProductRevenue> {
    let mut panel: Vec<ProductRevenue> = sum_by(records, |r| r.product, |r| r.actual_revenue)
        .into_iter()
        .map(|(product, revenue)| ProductRevenue { product, revenue })
        .collect();
    panel.sort_by(|a, b| a.revenue.total_cmp(&b.revenue));
    panel
}

/// Attributed revenue by marketing program, descending.
pub fn program_performance(records: &[Opportunity]) -> Vec<ProgramRevenue> {
    let mut panel: Vec<ProgramRevenue> =
        sum_by(records, |r| r.marketing_program, |r| r.actual_revenue)
            .into_iter()
            .map(|(program, revenue)| ProgramRevenue { program, revenue })
            .collect();
    panel.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    panel
}

fn sum_by<K, F, V>(records: &[Opportunity], key: F, value: V) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&Opportunity) -> K,
    V: Fn(&Opportunity) -> f64,
{
    let mut totals = BTreeMap::new();
    for r in records {
        *totals.entry(key(r)).or_insert(0.0) += value(r);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn opp(
        region: Region,
        channel: Channel,
        stage: SalesStage,
        month: u32,
        deal_size: f64,
    ) -> Opportunity {
        let created = NaiveDate::from_ymd_opt(2024, month, 10).unwrap();
        let probability = stage.probability();
        let expected = deal_size * probability as f64 / 100.0;
        let actual = match stage {
            SalesStage::ClosedWon => deal_size,
            SalesStage::ClosedLost => 0.0,
            _ => expected,
        };
        Opportunity {
            id: "OPP_00000".into(),
            created_date: created,
            close_date: created + chrono::Days::new(45),
            region,
            product: Product::CloudSecurity,
            channel,
            sales_stage: stage,
            deal_size,
            probability,
            expected_revenue: expected,
            actual_revenue: actual,
            marketing_program: MarketingProgram::Webinar,
            quarter: (month - 1) / 3 + 1,
            month,
        }
    }

    fn fixture() -> Vec<Opportunity> {
        vec![
            opp(Region::Emea, Channel::Online, SalesStage::ClosedWon, 1, 1000.0),
            opp(Region::Emea, Channel::Online, SalesStage::ClosedLost, 1, 400.0),
            opp(Region::Apac, Channel::DirectSales, SalesStage::Proposal, 3, 500.0),
            opp(Region::NorthAmerica, Channel::DirectSales, SalesStage::ClosedWon, 3, 5000.0),
        ]
    }

    #[test]
    fn test_region_panel_ascending_with_mean_flag() {
        let panel = revenue_by_region(&fixture());
        let regions: Vec<Region> = panel.iter().map(|p| p.region).collect();
        assert_eq!(regions, vec![Region::Apac, Region::Emea, Region::NorthAmerica]);
        assert_eq!(panel[0].revenue, 300.0);
        // mean = (300 + 1000 + 5000) / 3 = 2100
        assert!(!panel[0].above_mean);
        assert!(!panel[1].above_mean);
        assert!(panel[2].above_mean);
    }

    #[test]
    fn test_stage_panel_has_every_stage() {
        let panel = pipeline_by_stage(&fixture());
        assert_eq!(panel.len(), 6);
        assert_eq!(panel[0].stage, SalesStage::Prospecting);
        assert_eq!(panel[0].pipeline, 0.0);
        assert_eq!(panel[2].pipeline, 500.0);
        assert_eq!(panel[4].pipeline, 6000.0);
        assert_eq!(panel[5].pipeline, 400.0);
    }

    #[test]
    fn test_monthly_trend() {
        let trend = monthly_trend(&fixture());
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].month, 1);
        assert_eq!(trend[0].actual_revenue, 1000.0);
        assert_eq!(trend[0].expected_revenue, 1000.0);
        assert_eq!(trend[1].month, 3);
        assert_eq!(trend[1].actual_revenue, 5300.0);
    }

    #[test]
    fn test_channel_performance_average() {
        let panel = channel_performance(&fixture());
        let direct = panel.iter().find(|p| p.channel == Channel::DirectSales).unwrap();
        assert_eq!(direct.deals, 2);
        assert_eq!(direct.revenue, 5300.0);
        assert_eq!(direct.avg_revenue_per_deal, 2650.0);
    }

    #[test]
    fn test_program_panel_descending() {
        let mut records = fixture();
        records[0].marketing_program = MarketingProgram::TradeShow;
        let panel = program_performance(&records);
        assert_eq!(panel[0].program, MarketingProgram::Webinar);
        assert!(panel.windows(2).all(|w| w[0].revenue >= w[1].revenue));
    }

    #[test]
    fn test_empty_dataset_panels() {
        assert!(revenue_by_region(&[]).is_empty());
        assert!(monthly_trend(&[]).is_empty());
        assert!(product_mix(&[]).is_empty());
        assert!(pipeline_by_stage(&[]).iter().all(|s| s.pipeline == 0.0));
    }
}
