pub mod aggregate;
pub mod join;
pub mod rank;
pub mod rates;
pub mod reconcile;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::load::{load_applications, load_decisions};
use crate::report::{country_snapshot, CountrySnapshot, RateAudit};
use crate::table::{ApplicationRecord, AsylumSummary, DecisionRecord, JoinedRow, RatedDecision};

use self::aggregate::{aggregate_applications, aggregate_decisions, collapse_to_asylum};
use self::join::left_join;
use self::rank::{rank, Ranking};
use self::rates::rate;
use self::reconcile::{reconcile, ReconcileReport};

/// Every table the pipeline produced, from the reconciled input to the ranking.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub reconcile_report: ReconcileReport,
    /// Aggregated per (year, origin, asylum).
    pub applications: Vec<ApplicationRecord>,
    pub decisions: Vec<RatedDecision>,
    pub rate_audit: RateAudit,
    pub joined: Vec<JoinedRow>,
    pub summaries: Vec<AsylumSummary>,
    pub ranking: Ranking,
    /// 1-based rank of the focus country over the window.
    pub focus_rank: Option<usize>,
    /// Focus-country spot checks, labelled by the stage they were taken at.
    pub snapshots: Vec<(&'static str, CountrySnapshot)>,
}

pub struct Pipeline;

impl Pipeline {
    /// Load both input files and run every step.
    pub fn run(config: &PipelineConfig) -> Result<PipelineOutput> {
        let applications = load_applications(&config.applications_csv)?;
        let decisions = load_decisions(&config.decisions_csv)?;
        Ok(Self::run_tables(&applications, &decisions, config))
    }

    /// Run every step on already loaded tables. Each step returns a new table.
    pub fn run_tables(
        applications: &[ApplicationRecord],
        decisions: &[DecisionRecord],
        config: &PipelineConfig,
    ) -> PipelineOutput {
        let focus = config.chart.focus_country.as_str();
        let years = config.snapshot_years();
        let mut snapshots = Vec::new();
        let mut spot_check = |stage: &'static str, snap: CountrySnapshot| {
            snap.log(stage);
            snapshots.push((stage, snap));
        };

        for &year in &years {
            spot_check("loaded", country_snapshot(applications, decisions, focus, year));
        }

        let reconciled = reconcile(decisions);
        for &year in &years {
            spot_check(
                "reconciled",
                country_snapshot(applications, &reconciled.records, focus, year),
            );
        }

        let grouped_applications = aggregate_applications(applications);
        let grouped_decisions = aggregate_decisions(&reconciled.records);
        let rated = rate(&grouped_decisions);
        let rate_audit = RateAudit::of(&rated);
        rate_audit.log();

        let joined = left_join(&grouped_applications, &rated);
        for &year in &years {
            spot_check("joined", CountrySnapshot::of(&joined, focus, year));
        }

        let summaries = collapse_to_asylum(&joined);
        for &year in &years {
            spot_check("collapsed", CountrySnapshot::of(&summaries, focus, year));
        }

        let ranking = rank(&summaries, config.window, config.top_n);
        let focus_rank = ranking.position(focus);
        match focus_rank {
            Some(position) => info!(focus, position, of = ranking.entries().len(), "focus country rank"),
            None => warn!(focus, "focus country has no applications in the window"),
        }

        info!(
            applications = grouped_applications.len(),
            decisions = rated.len(),
            joined = joined.len(),
            summaries = summaries.len(),
            "pipeline finished"
        );

        PipelineOutput {
            reconcile_report: reconciled.report,
            applications: grouped_applications,
            decisions: rated,
            rate_audit,
            joined,
            summaries,
            ranking,
            focus_rank,
            snapshots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{AsylumKey, DecisionCounts, OriginAsylumKey};
    use std::{fs, path::Path};
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,asylumstats::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn app(year: i32, origin: &str, asylum: &str, applied: i64) -> ApplicationRecord {
        ApplicationRecord {
            key: OriginAsylumKey::new(year, origin, asylum),
            applied: Some(applied),
        }
    }

    fn dec(year: i32, origin: &str, asylum: &str, counts: DecisionCounts) -> DecisionRecord {
        DecisionRecord {
            key: OriginAsylumKey::new(year, origin, asylum),
            counts,
        }
    }

    #[test]
    fn worked_example_end_to_end() {
        init_test_logging();
        let mut published = DecisionCounts::new(30, 10, 50, 5);
        published.total = Some(97);

        let out = Pipeline::run_tables(
            &[app(2022, "AFG", "GBR", 100)],
            &[dec(2022, "AFG", "GBR", published)],
            &PipelineConfig::default(),
        );

        assert_eq!(out.reconcile_report.mismatched_rows, 1);
        assert_eq!(out.decisions[0].counts.total, Some(95));
        let granted = out.decisions[0].rates.granted.unwrap();
        assert!((granted - 30.0 / 95.0).abs() < 1e-12);

        let gbr = out
            .summaries
            .iter()
            .find(|s| s.key == AsylumKey::new(2022, "GBR"))
            .unwrap();
        assert_eq!(gbr.applied, Some(100));
        assert_eq!(gbr.counts.total, Some(95));
        assert_eq!(gbr.backlog, Some(-5));
        assert_eq!(gbr.fvp, Some(0.95));
    }

    #[test]
    fn zero_decisions_do_not_raise() {
        init_test_logging();
        let out = Pipeline::run_tables(
            &[app(2020, "AFG", "DEU", 3)],
            &[dec(2020, "AFG", "DEU", DecisionCounts::new(0, 0, 0, 0))],
            &PipelineConfig::default(),
        );

        assert_eq!(out.decisions[0].counts.total, Some(0));
        assert!(out.decisions[0].rates.is_undefined());
        assert_eq!(out.rate_audit.undefined, 1);
        assert_eq!(out.summaries[0].fvp, Some(0.0));
    }

    #[test]
    fn joined_keeps_every_aggregated_application() {
        init_test_logging();
        let apps = vec![
            app(2019, "AFG", "GBR", 1),
            app(2019, "AFG", "GBR", 2),
            app(2019, "SYR", "DEU", 3),
            app(2020, "ERI", "ITA", 4),
        ];
        let decs = vec![dec(2019, "SYR", "DEU", DecisionCounts::new(1, 0, 1, 0))];

        let out = Pipeline::run_tables(&apps, &decs, &PipelineConfig::default());

        assert_eq!(out.applications.len(), 3);
        assert_eq!(out.joined.len(), out.applications.len());
        for (row, app) in out.joined.iter().zip(&out.applications) {
            assert_eq!(row.key, app.key);
        }
        assert_eq!(out.ranking.period_total(), 10);
    }

    #[test]
    fn focus_country_spot_checks_each_stage() {
        init_test_logging();
        let out = Pipeline::run_tables(
            &[app(2022, "AFG", "GBR", 10), app(2023, "AFG", "GBR", 20)],
            &[dec(2023, "AFG", "GBR", DecisionCounts::new(1, 2, 3, 4))],
            &PipelineConfig::default(),
        );

        let stages: Vec<&str> = out.snapshots.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            stages,
            vec![
                "loaded",
                "loaded",
                "reconciled",
                "reconciled",
                "joined",
                "joined",
                "collapsed",
                "collapsed"
            ]
        );
        let (_, joined_2023) = &out.snapshots[5];
        assert_eq!(joined_2023.year, 2023);
        assert_eq!(joined_2023.applied, Some(20));
        assert_eq!(joined_2023.total_decisions, Some(10));
        // collapsing away origin keeps the country's figures
        assert_eq!(out.snapshots[7].1, *joined_2023);
        assert_eq!(out.snapshots[6].1.total_decisions, None);
    }

    #[test]
    fn focus_rank_follows_ranking() {
        init_test_logging();
        let apps = [
            app(2021, "AFG", "DEU", 300),
            app(2021, "SYR", "GBR", 100),
            app(2022, "ERI", "ITA", 200),
        ];

        let out = Pipeline::run_tables(&apps, &[], &PipelineConfig::default());
        assert_eq!(out.focus_rank, Some(3));

        let mut elsewhere = PipelineConfig::default();
        elsewhere.chart.focus_country = "FRA".to_string();
        let out = Pipeline::run_tables(&apps, &[], &elsewhere);
        assert_eq!(out.focus_rank, None);
        assert_eq!(out.ranking.entries().len(), 3);
    }

    #[test]
    fn run_reads_both_files() -> Result<()> {
        init_test_logging();
        let dir = tempfile::tempdir()?;
        let write = |name: &str, text: &str| -> Result<std::path::PathBuf> {
            let p = dir.path().join(name);
            fs::write(&p, text)?;
            Ok(p)
        };
        let config = PipelineConfig {
            applications_csv: write(
                "asylum-applications.csv",
                "Year,Country of origin (ISO),Country of asylum (ISO),applied\n\
                 2022,AFG,GBR,60\n2022,AFG,GBR,40\n2021,SYR,DEU,500\n2010,SYR,DEU,9999\n",
            )?,
            decisions_csv: write(
                "asylum-decisions.csv",
                "Year,Country of origin (ISO),Country of asylum (ISO),Recognized decisions,\
                 Complementary protection,Rejected decisions,Otherwise closed,Total decisions\n\
                 2022,AFG,GBR,30,10,50,5,95\n",
            )?,
            ..Default::default()
        };

        let out = Pipeline::run(&config)?;

        assert!(out.reconcile_report.is_clean());
        assert_eq!(out.ranking.countries(), vec!["DEU", "GBR"]);
        assert_eq!(out.ranking.period_total(), 600);
        assert!(Path::new(&config.applications_csv).exists());
        Ok(())
    }
}
