use adiz_dashboard::build_dashboard;
use adiz_dashboard::config::{Config, SourceMode};
use adiz_dashboard::error::LoadError;
use adiz_dashboard::pipeline::normalize::Normalizer;
use adiz_dashboard::pipeline::present::Measure;
use adiz_dashboard::pipeline::ViewRequest;
use anyhow::Result;
use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;

// Upstream header spelling, including the AIDZ typo, and a few defective rows.
const UPSTREAM_CSV: &str = "\u{feff}日期,共機架次,進入AIDZ共機架次,共艦架次,備註\n\
2024/1/1,8,2,1,\n\
2024/1/2,10,3,1,\n\
not a date,5,5,5,\n\
2099/1/1,1,1,1,\n\
2024/1/4,,4,2,補登\n\
2024/1/7,6,1,0,\n";

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn local_config(path: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.source.mode = SourceMode::Local;
    config.source.local_path = path.to_path_buf();
    config
}

#[tokio::test]
async fn local_file_through_full_pipeline() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("mnd.csv");
    fs::write(&path, UPSTREAM_CSV)?;

    let dashboard = build_dashboard(&local_config(&path));
    let view = dashboard.render(ViewRequest::default()).await?;

    assert_eq!(view.load.rows_read, 6);
    assert_eq!(view.load.rows_kept, 4);
    assert_eq!(view.load.rows_dropped, 2);
    assert_eq!(view.summary.as_of, Some(day(2024, 1, 7)));

    // Newest first, no gap filling.
    let dates: Vec<&str> = view.table.iter().map(|r| r.date_str.as_str()).collect();
    assert_eq!(dates, ["2024-01-07", "2024-01-04", "2024-01-02", "2024-01-01"]);

    // Blank aircraft cell became zero.
    assert_eq!(view.table[1].total_aircraft, 0);
    assert_eq!(view.table[1].enter_adiz, 4);

    let ships = view.summary.metric(Measure::Ships).unwrap();
    assert_eq!((ships.value, ships.delta), (Some(0), -2));
    Ok(())
}

#[tokio::test]
async fn two_day_deltas() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("mnd.csv");
    fs::write(
        &path,
        "日期,共機架次,進入AIDZ共機架次,共艦架次\n2024/1/1,8,2,1\n2024/1/2,10,3,1\n",
    )?;

    let dashboard = build_dashboard(&local_config(&path));
    let view = dashboard.render(ViewRequest::default()).await?;

    let deltas: Vec<(Option<u32>, i64)> = view
        .summary
        .metrics
        .iter()
        .map(|m| (m.value, m.delta))
        .collect();
    assert_eq!(deltas, vec![(Some(10), 2), (Some(3), 1), (Some(1), 0)]);
    Ok(())
}

#[tokio::test]
async fn export_reloads_to_the_same_rows() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("mnd.csv");
    fs::write(&path, UPSTREAM_CSV)?;

    let dashboard = build_dashboard(&local_config(&path));
    let request = ViewRequest::new(Some(day(2024, 1, 2)), Some(day(2024, 1, 7)));
    let view = dashboard.render(request).await?;
    let bytes = dashboard.export(request).await?;

    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));

    let reloaded = Normalizer::default().normalize(&bytes)?;
    assert!(reloaded.report.rejections.is_empty());
    let reloaded_rows: Vec<String> = reloaded
        .dataset
        .iter()
        .map(|r| format!("{} {} {} {}", r.date, r.total_aircraft, r.enter_adiz, r.ships))
        .collect();
    let shown_rows: Vec<String> = view
        .table
        .iter()
        .map(|r| format!("{} {} {} {}", r.date_str, r.total_aircraft, r.enter_adiz, r.ships))
        .collect();
    assert_eq!(reloaded_rows, shown_rows);
    Ok(())
}

#[tokio::test]
async fn reversed_range_is_normalized() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("mnd.csv");
    fs::write(&path, UPSTREAM_CSV)?;

    let dashboard = build_dashboard(&local_config(&path));
    let forward = dashboard
        .render(ViewRequest::new(Some(day(2024, 1, 2)), Some(day(2024, 1, 4))))
        .await?;
    let backward = dashboard
        .render(ViewRequest::new(Some(day(2024, 1, 4)), Some(day(2024, 1, 2))))
        .await?;
    assert_eq!(forward.table, backward.table);
    assert_eq!(forward.table.len(), 2);
    Ok(())
}

#[tokio::test]
async fn missing_local_file_fails_the_render() {
    let temp_dir = tempdir().unwrap();
    let dashboard = build_dashboard(&local_config(&temp_dir.path().join("absent.csv")));

    let err = dashboard.render(ViewRequest::default()).await.unwrap_err();
    assert!(matches!(err, LoadError::SourceNotFound { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

#[tokio::test]
async fn synthetic_source_respects_adiz_bound() -> Result<()> {
    let mut config = Config::default();
    config.source.mode = SourceMode::Synthetic;
    config.source.synthetic_days = 30;
    config.source.synthetic_seed = Some(42);

    let dashboard = build_dashboard(&config);
    let view = dashboard.render(ViewRequest::default()).await?;

    assert_eq!(view.table.len(), 30);
    assert_eq!(view.load.rows_dropped, 0);
    assert!(view.table.iter().all(|r| r.enter_adiz <= r.total_aircraft));
    Ok(())
}
