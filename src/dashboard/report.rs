//! Dashboard report assembly and output.

use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::statistics::Statistics;

use super::{
    channel_performance, monthly_trend, pipeline_by_stage, product_mix, program_performance,
    revenue_by_region, ChannelPerformance, MonthlyRevenue, ProductRevenue, ProgramRevenue,
    RegionRevenue, StagePipeline,
};
use crate::format::{format_millions, format_usd};
use crate::opportunity::{Channel, Opportunity, SalesStage};

/// Headline figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub opportunities: usize,
    pub total_pipeline: f64,
    pub closed_won_revenue: f64,
    /// Share of opportunities in Closed Won, percent.
    pub win_rate_pct: f64,
    pub avg_deal_size: f64,
    pub top_region: Option<RegionRevenue>,
    pub top_channel: Option<Channel>,
}

impl ExecutiveSummary {
    pub fn compute(
        records: &[Opportunity],
        regions: &[RegionRevenue],
        channels: &[ChannelPerformance],
    ) -> Self {
        let won: Vec<&Opportunity> = records
            .iter()
            .filter(|r| r.sales_stage == SalesStage::ClosedWon)
            .collect();

        let (win_rate_pct, avg_deal_size) = if records.is_empty() {
            (0.0, 0.0)
        } else {
            (
                won.len() as f64 / records.len() as f64 * 100.0,
                records.iter().map(|r| r.deal_size).mean(),
            )
        };

        Self {
            opportunities: records.len(),
            total_pipeline: records.iter().map(|r| r.deal_size).sum(),
            closed_won_revenue: won.iter().map(|r| r.actual_revenue).sum(),
            win_rate_pct,
            avg_deal_size,
            top_region: regions
                .iter()
                .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
                .cloned(),
            top_channel: channels
                .iter()
                .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
                .map(|c| c.channel),
        }
    }
}

/// Every panel plus the executive summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub title: String,
    pub summary: ExecutiveSummary,
    pub revenue_by_region: Vec<RegionRevenue>,
    pub pipeline_by_stage: Vec<StagePipeline>,
    pub monthly_trend: Vec<MonthlyRevenue>,
    pub channel_performance: Vec<ChannelPerformance>,
    pub product_mix: Vec<ProductRevenue>,
    pub program_performance: Vec<ProgramRevenue>,
}

impl DashboardReport {
    pub fn build(records: &[Opportunity]) -> Self {
        let regions = revenue_by_region(records);
        let channels = channel_performance(records);
        let summary = ExecutiveSummary::compute(records, &regions, &channels);

        Self {
            title: "Revenue Operations Dashboard - Cybersecurity SME Segment".to_string(),
            summary,
            revenue_by_region: regions,
            pipeline_by_stage: pipeline_by_stage(records),
            monthly_trend: monthly_trend(records),
            channel_performance: channels,
            product_mix: product_mix(records),
            program_performance: program_performance(records),
        }
    }

    /// Write as pretty JSON, creating the parent directory if needed.
    pub fn write_json(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Executive summary text.
    pub fn executive_summary(&self) -> String {
        let s = &self.summary;
        let rule = "=".repeat(60);
        let mut out = String::new();

        out.push_str(&format!(
            "{rule}\nEXECUTIVE SUMMARY - REVENUE OPERATIONS\n{rule}\n"
        ));
        out.push_str(&format!("Opportunities: {}\n", s.opportunities));
        out.push_str(&format!("Total Pipeline Value: {}\n", format_usd(s.total_pipeline)));
        out.push_str(&format!(
            "Closed Won Revenue: {}\n",
            format_usd(s.closed_won_revenue)
        ));
        out.push_str(&format!("Win Rate: {:.1}%\n", s.win_rate_pct));
        out.push_str(&format!("Average Deal Size: {}\n", format_usd(s.avg_deal_size)));
        match &s.top_region {
            Some(top) => out.push_str(&format!(
                "Top Region: {} ({})\n",
                top.region,
                format_usd(top.revenue)
            )),
            None => out.push_str("Top Region: n/a\n"),
        }
        match s.top_channel {
            Some(channel) => out.push_str(&format!("Top Channel: {}\n", channel)),
            None => out.push_str("Top Channel: n/a\n"),
        }
        out
    }

    /// Panel tables followed by the executive summary.
    pub fn render_text(&self) -> String {
        let mut out = format!("{}\n\n", self.title);

        out.push_str("Revenue by Region\n");
        for p in &self.revenue_by_region {
            let marker = if p.above_mean { "+" } else { "-" };
            out.push_str(&format!(
                "  {} {:<22} {:>10}\n",
                marker,
                p.region.label(),
                format_millions(p.revenue)
            ));
        }

        out.push_str("\nSales Pipeline by Stage\n");
        for p in &self.pipeline_by_stage {
            out.push_str(&format!(
                "    {:<22} {:>10}\n",
                p.stage.label(),
                format_millions(p.pipeline)
            ));
        }

        out.push_str("\nMonthly Revenue Trend (actual / expected)\n");
        for m in &self.monthly_trend {
            out.push_str(&format!(
                "    {:>2}  {:>10} / {:>10}\n",
                m.month,
                format_millions(m.actual_revenue),
                format_millions(m.expected_revenue)
            ));
        }

        out.push_str("\nChannel Performance (deals, revenue, avg per deal)\n");
        for c in &self.channel_performance {
            out.push_str(&format!(
                "    {:<22} {:>6} {:>10} {:>16}\n",
                c.channel.label(),
                c.deals,
                format_millions(c.revenue),
                format_usd(c.avg_revenue_per_deal)
            ));
        }

        out.push_str("\nRevenue by Product Line\n");
        for p in &self.product_mix {
            out.push_str(&format!(
                "    {:<22} {:>10}\n",
                p.product.label(),
                format_millions(p.revenue)
            ));
        }

        out.push_str("\nMarketing Program Performance\n");
        for p in &self.program_performance {
            out.push_str(&format!(
                "    {:<22} {:>10}\n",
                p.program.label(),
                format_millions(p.revenue)
            ));
        }

        out.push('\n');
        out.push_str(&self.executive_summary());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{generate_opportunities, GeneratorConfig};

    fn records(n: usize) -> Vec<Opportunity> {
        generate_opportunities(&GeneratorConfig {
            n_opportunities: n,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_summary_matches_records() {
        let records = records(1000);
        let report = DashboardReport::build(&records);
        let s = &report.summary;

        let won = records
            .iter()
            .filter(|r| r.sales_stage == SalesStage::ClosedWon)
            .count();
        assert_eq!(s.opportunities, 1000);
        assert!((s.win_rate_pct - won as f64 / 10.0).abs() < 1e-9);
        assert!((s.avg_deal_size * 1000.0 - s.total_pipeline).abs() / s.total_pipeline < 1e-9);
        assert!(s.win_rate_pct >= 0.0 && s.win_rate_pct <= 100.0);

        let top = s.top_region.as_ref().unwrap();
        assert_eq!(Some(top), report.revenue_by_region.last());
    }

    #[test]
    fn test_stage_pipeline_sums_to_total() {
        let report = DashboardReport::build(&records(500));
        let staged: f64 = report.pipeline_by_stage.iter().map(|s| s.pipeline).sum();
        assert!((staged - report.summary.total_pipeline).abs() / staged < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let report = DashboardReport::build(&[]);
        assert_eq!(report.summary.opportunities, 0);
        assert_eq!(report.summary.win_rate_pct, 0.0);
        assert_eq!(report.summary.avg_deal_size, 0.0);
        assert!(report.summary.top_region.is_none());
        assert!(report.executive_summary().contains("Top Channel: n/a"));
    }

    #[test]
    fn test_json_uses_labels() {
        let report = DashboardReport::build(&records(50));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pipeline_by_stage"][4]["stage"], "Closed Won");
        assert!(json["summary"]["win_rate_pct"].is_number());
    }

    #[test]
    fn test_render_text_sections() {
        let text = DashboardReport::build(&records(200)).render_text();
        for heading in [
            "Revenue by Region",
            "Sales Pipeline by Stage",
            "Monthly Revenue Trend",
            "Channel Performance",
            "Revenue by Product Line",
            "Marketing Program Performance",
            "EXECUTIVE SUMMARY",
        ] {
            assert!(text.contains(heading), "missing {}", heading);
        }
    }
}
