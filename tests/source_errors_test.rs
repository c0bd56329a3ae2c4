use anyhow::Result;
use tempfile::TempDir;
use txn_feed::{
    app, BatchSink, EtlEngine, EtlError, LocalStorage, RecordTransformer, SourceRow, TomlConfig,
};

const HEADER: &str =
    "trans_num,cc_num,trans_date_trans_time,unix_time,amt,merchant,category,merch_lat,merch_long";

fn rows(prefix: &str, count: usize) -> String {
    let mut content = format!("{}\n", HEADER);
    for i in 0..count {
        content.push_str(&format!(
            "{prefix}{i},4111111111111111,2024-01-01 10:00:00,1704103200,10.0,Shop,misc,40.0,-75.0\n"
        ));
    }
    content
}

/// 缺少欄位、格式錯誤或不存在的檔案都只會被略過
#[test]
fn test_every_broken_source_is_skipped() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path();

    std::fs::write(dir.join("good_1.csv"), rows("G", 3))?;
    std::fs::write(dir.join("no_amount.csv"), "trans_num,cc_num\nX1,4111\n")?;
    std::fs::write(dir.join("empty.csv"), "")?;
    std::fs::write(dir.join("binary.csv"), [0xff, 0xfe, 0x00, 0x01])?;
    std::fs::write(dir.join("good_2.csv"), rows("H", 2))?;

    let sources = [
        "good_1.csv",
        "missing.csv",
        "no_amount.csv",
        "empty.csv",
        "binary.csv",
        "good_2.csv",
    ]
    .map(|name| dir.join(name));

    let transformer = RecordTransformer::new(sources, SourceRow::default_required_fields(), 2);
    let mut stream = transformer.produce();
    let ids: Vec<String> = stream.by_ref().map(|d| d.transaction_id).collect();

    assert_eq!(ids, vec!["G0", "G1", "G2", "H0", "H1"]);

    let report = stream.report();
    assert_eq!(report.files_read.len(), 2);
    assert_eq!(report.rows_read(), 5);
    let skipped: Vec<String> = report
        .files_skipped
        .iter()
        .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        skipped,
        vec!["missing.csv", "no_amount.csv", "empty.csv", "binary.csv"]
    );
    Ok(())
}

#[test]
fn test_required_fields_may_include_extra_columns() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("with_fraud.csv");
    std::fs::write(
        &path,
        format!(
            "{},is_fraud\nT1,4111111111111111,2024-01-01 10:00:00,1704103200,10.0,Shop,misc,40.0,-75.0,1\n",
            HEADER
        ),
    )?;

    let mut required = SourceRow::default_required_fields();
    required.push("is_fraud".to_string());
    let documents: Vec<_> = RecordTransformer::new([&path], required.clone(), 10)
        .produce()
        .collect();
    assert_eq!(documents.len(), 1);

    // 檔案缺少 is_fraud 時整個檔案會被略過
    std::fs::write(&path, rows("T", 1))?;
    let documents: Vec<_> = RecordTransformer::new([&path], required, 10)
        .produce()
        .collect();
    assert!(documents.is_empty());
    Ok(())
}

#[test]
fn test_batch_write_failure_is_reported() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("a.csv");
    std::fs::write(&source, rows("A", 2))?;
    std::fs::write(temp_dir.path().join("not_a_dir"), "x")?;

    let transformer = RecordTransformer::new([&source], SourceRow::default_required_fields(), 10);
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());
    let sink = BatchSink::new(storage, "not_a_dir/transactions.json");
    let mut engine = EtlEngine::new(transformer, sink);

    let err = engine.run().unwrap_err();
    assert!(matches!(err, EtlError::OutputWriteError { .. }));
    assert!(!temp_dir.path().join("not_a_dir/transactions.json").exists());
    Ok(())
}

#[test]
fn test_batch_with_all_sources_missing_writes_empty_array() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("transactions.json");
    let config = TomlConfig::from_toml_str(&format!(
        r#"
[source]
files = ["{0}/fraudTrain_part_01.csv", "{0}/fraudTrain_part_02.csv"]

[output]
mode = "batch"
path = "{1}"
"#,
        temp_dir.path().display(),
        output.display()
    ))?;

    let summary = app::run(&config, false)?;

    assert_eq!(summary.documents, 0);
    assert_eq!(summary.sources.files_skipped.len(), 2);
    assert_eq!(std::fs::read_to_string(&output)?, "[]");
    Ok(())
}

/// 空白或非數字的數值欄位原樣輸出，不會讓整個檔案被略過
#[test]
fn test_odd_numeric_cells_reach_the_batch_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("odd.csv");
    std::fs::write(
        &source,
        format!(
            "{}\n\
             T1,4111111111111111,2024-01-01 10:00:00,1704103200,10.0,Shop,misc,40.0,-75.0\n\
             T2, 0411,2024-01-01 10:00:01,1704103201.0,,Shop,misc,n/a,-75.0\n",
            HEADER
        ),
    )?;

    let transformer = RecordTransformer::new([&source], SourceRow::default_required_fields(), 10);
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());
    let mut engine = EtlEngine::new(transformer, BatchSink::new(storage, "transactions.json"));
    let summary = engine.run()?;

    assert_eq!(summary.documents, 2);
    assert!(summary.sources.files_skipped.is_empty());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("transactions.json"))?)?;
    let odd = &written[1];
    assert_eq!(odd["customer_id"], "411");
    assert!(odd["transaction_details"]["amount"].is_null());
    assert_eq!(odd["transaction_details"]["unix_timestamp"], 1704103201.0);
    assert_eq!(odd["merchant_info"]["location"]["latitude"], "n/a");
    Ok(())
}
