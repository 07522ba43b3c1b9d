//! Integration tests from segmented periods to exported tables.

use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use hobart_data::{AssetName, AssetSeries};
use hobart_output::{
    ExportFormat, Exporter, ReportBuilder, change_by_year, generate_period_summary,
    rank_assets_by_std_dev, std_dev_by_year,
};
use hobart_risk::{Portfolio, divide_in_periods};
use std::sync::Arc;

fn series(name: AssetName, rows: &[(i32, u32, u32, f64)]) -> AssetSeries {
    AssetSeries::from_rows(
        name,
        rows.iter()
            .map(|&(y, m, d, p)| (NaiveDate::from_ymd_opt(y, m, d).unwrap(), p))
            .collect(),
    )
    .unwrap()
}

fn universe() -> Vec<AssetSeries> {
    vec![
        series(
            AssetName::Oil,
            &[
                (2020, 3, 2, 50.0),
                (2020, 3, 3, 47.0),
                (2020, 3, 4, 49.0),
                (2020, 3, 5, 46.0),
                (2021, 3, 1, 60.0),
                (2021, 3, 2, 61.5),
                (2021, 3, 3, 60.0),
                (2021, 3, 4, 63.0),
            ],
        ),
        series(
            AssetName::Gold,
            &[
                (2020, 3, 2, 1600.0),
                (2020, 3, 3, 1610.0),
                (2020, 3, 4, 1630.0),
                (2020, 3, 5, 1625.0),
                (2021, 3, 1, 1720.0),
                (2021, 3, 2, 1710.0),
                (2021, 3, 3, 1716.0),
                (2021, 3, 4, 1700.0),
            ],
        ),
    ]
}

#[test]
fn test_yearly_tables_follow_period_order() {
    let periods = divide_in_periods(&universe()).unwrap();
    let changes = change_by_year(AssetName::Oil, &periods).unwrap();

    assert_eq!(
        changes.rows.iter().map(|r| r.period.as_str()).collect::<Vec<_>>(),
        vec!["2020", "2021"]
    );
    assert_abs_diff_eq!(changes.get("2020").unwrap(), -0.08, epsilon = 1e-12);
    assert_abs_diff_eq!(changes.get("2021").unwrap(), 0.05, epsilon = 1e-12);

    let csv = vec![changes, std_dev_by_year(AssetName::Gold, &periods).unwrap()]
        .export_to_string(ExportFormat::Csv)
        .unwrap();
    assert_eq!(csv.lines().count(), 5);
}

#[test]
fn test_ranking_puts_gold_first() {
    let ranking = rank_assets_by_std_dev(&universe());
    assert_eq!(ranking[0].asset, AssetName::Gold);
    assert_eq!(ranking[1].asset, AssetName::Oil);
}

#[test]
fn test_period_summaries_in_report() {
    let periods = divide_in_periods(&universe()).unwrap();
    let summaries = periods
        .iter()
        .map(|period| {
            let portfolio = Portfolio::min_variance(Arc::clone(period)).unwrap();
            generate_period_summary(period, Some(&portfolio)).unwrap()
        })
        .collect::<Vec<_>>();

    for summary in &summaries {
        let mv = summary.min_variance.as_ref().unwrap();
        assert_abs_diff_eq!(mv.total_weight(), 1.0, epsilon = 1e-9);
    }

    let report = ReportBuilder::new()
        .title("Yearly minimum variance")
        .assets(vec![AssetName::Oil, AssetName::Gold])
        .periods(periods.iter().map(|p| p.label()).collect())
        .contents(&summaries)
        .unwrap()
        .build()
        .unwrap();

    let json = report.to_json().unwrap();
    assert!(json.contains("\"Yearly minimum variance\""));
    assert!(json.contains("\"min_variance\""));
    assert!(json.contains("\"2021\""));
}
