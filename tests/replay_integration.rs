use copyguard::utils::error::GuardError;
use copyguard::{CliConfig, LocalStorage, ReplayEngine, SuppressionPipeline};
use tempfile::TempDir;

fn write_trace(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path.to_str().unwrap().to_string()
}

fn config_for(trace: String, output_path: String) -> CliConfig {
    CliConfig {
        trace,
        output_path,
        blocked_keys: vec![
            "c".to_string(),
            "u".to_string(),
            "s".to_string(),
            "p".to_string(),
        ],
        allow_context_menu: false,
        expected_origin: None,
        verbose: false,
        monitor: false,
    }
}

#[tokio::test]
async fn test_end_to_end_replay_with_recorded_trace() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let trace = write_trace(
        &temp_dir,
        "session.jsonl",
        concat!(
            "{\"kind\":\"meta\",\"page_url\":\"https://shop.example.com/catalog\",\"agent\":\"recorder-1\"}\n",
            "{\"kind\":\"contextmenu\",\"at_ms\":100,\"x\":120,\"y\":40,\"button\":2}\n",
            "{\"kind\":\"keydown\",\"at_ms\":200,\"key\":\"c\",\"modifiers\":{\"ctrl\":true}}\n",
            "{\"kind\":\"keydown\",\"at_ms\":300,\"key\":\"s\",\"modifiers\":{\"ctrl\":true}}\n",
            "{\"kind\":\"keydown\",\"at_ms\":400,\"key\":\"a\",\"modifiers\":{\"ctrl\":true}}\n",
            "{\"kind\":\"keydown\",\"at_ms\":500,\"key\":\"c\"}\n",
            "{\"kind\":\"keyup\",\"at_ms\":600,\"key\":\"c\"}\n",
            "{\"kind\":\"click\",\"at_ms\":700,\"x\":10,\"y\":20}\n",
        ),
    );

    let config = config_for(trace, output_path.clone());

    // Create storage and pipeline
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = SuppressionPipeline::new(storage, config);

    // Create and run replay engine
    let engine = ReplayEngine::new_with_monitoring(pipeline, false);
    let result = engine.run().await;

    // Verify results
    assert!(result.is_ok());

    let report_path = result.unwrap();
    assert!(report_path.contains("guard_report.zip"));

    // Verify report bundle exists
    let full_path = std::path::Path::new(&output_path).join("guard_report.zip");
    assert!(full_path.exists());

    // Verify ZIP content
    let zip_data = std::fs::read(&full_path).unwrap();
    let cursor = std::io::Cursor::new(zip_data);
    let mut archive = zip::ZipArchive::new(cursor).unwrap();

    let file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();

    assert!(file_names.contains(&"report.csv".to_string()));
    assert!(file_names.contains(&"report.json".to_string()));
    assert!(file_names.contains(&"suppressed.json".to_string()));

    // Verify CSV audit rows
    let mut csv_file = archive.by_name("report.csv").unwrap();
    let mut csv_content = String::new();
    std::io::Read::read_to_string(&mut csv_file, &mut csv_content).unwrap();
    drop(csv_file);

    assert!(csv_content.contains("seq,at_ms,kind,detail,default_prevented"));
    assert!(csv_content.contains("contextmenu"));
    assert!(csv_content.contains("ctrl+s"));
    assert!(csv_content.contains("ctrl+a"));

    // Verify summary in report.json
    let mut json_file = archive.by_name("report.json").unwrap();
    let mut json_content = String::new();
    std::io::Read::read_to_string(&mut json_file, &mut json_content).unwrap();
    drop(json_file);

    let report: serde_json::Value = serde_json::from_str(&json_content).unwrap();
    assert_eq!(report["summary"]["total_events"], 7);
    assert_eq!(report["summary"]["suppressed"], 3);
    assert_eq!(report["summary"]["context_menu_blocked"], 1);
    assert_eq!(report["summary"]["shortcuts_blocked"], 2);
    assert_eq!(report["summary"]["passed_through"], 4);
    assert_eq!(report["meta"]["page_url"], "https://shop.example.com/catalog");

    // Verify the suppressed subset
    let mut suppressed_file = archive.by_name("suppressed.json").unwrap();
    let mut suppressed_content = String::new();
    std::io::Read::read_to_string(&mut suppressed_file, &mut suppressed_content).unwrap();

    let suppressed: Vec<serde_json::Value> = serde_json::from_str(&suppressed_content).unwrap();
    assert_eq!(suppressed.len(), 3);
    assert!(suppressed.iter().all(|o| o["default_prevented"] == true));
}

#[tokio::test]
async fn test_end_to_end_with_monitoring() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let trace = write_trace(
        &temp_dir,
        "short.jsonl",
        "{\"kind\":\"keydown\",\"at_ms\":100,\"key\":\"s\",\"modifiers\":{\"ctrl\":true}}\n",
    );

    let mut config = config_for(trace, output_path.clone());
    config.verbose = true;
    config.monitor = true; // Enable monitoring

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = SuppressionPipeline::new(storage, config);
    let engine = ReplayEngine::new_with_monitoring(pipeline, true);

    let result = engine.run().await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_replay_fails_on_malformed_trace_line() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let trace = write_trace(
        &temp_dir,
        "broken.jsonl",
        concat!(
            "{\"kind\":\"meta\",\"page_url\":\"https://shop.example.com/catalog\"}\n",
            "{\"kind\":\"contextmenu\",\"at_ms\":100}\n",
            "{\"kind\":\"keydown\",\"at_ms\":200,\n",
        ),
    );

    let config = config_for(trace, output_path.clone());
    let storage = LocalStorage::new(output_path);
    let pipeline = SuppressionPipeline::new(storage, config);
    let engine = ReplayEngine::new(pipeline);

    let result = engine.run().await;

    assert!(result.is_err());
    match result.unwrap_err() {
        GuardError::TraceParseError { line, .. } => assert_eq!(line, 3),
        other => panic!("expected TraceParseError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_replay_fails_on_origin_mismatch() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let trace = write_trace(
        &temp_dir,
        "foreign.jsonl",
        concat!(
            "{\"kind\":\"meta\",\"page_url\":\"https://mirror.example.net/catalog\"}\n",
            "{\"kind\":\"contextmenu\",\"at_ms\":100}\n",
        ),
    );

    let mut config = config_for(trace, output_path.clone());
    config.expected_origin = Some("https://shop.example.com".to_string());

    let storage = LocalStorage::new(output_path);
    let pipeline = SuppressionPipeline::new(storage, config);
    let engine = ReplayEngine::new(pipeline);

    let result = engine.run().await;

    assert!(result.is_err());
    assert!(matches!(
        result.unwrap_err(),
        GuardError::ReplayError { .. }
    ));
}

#[tokio::test]
async fn test_custom_policy_changes_what_gets_suppressed() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let trace = write_trace(
        &temp_dir,
        "custom.jsonl",
        concat!(
            "{\"kind\":\"contextmenu\",\"at_ms\":100}\n",
            "{\"kind\":\"keydown\",\"at_ms\":200,\"key\":\"c\",\"modifiers\":{\"ctrl\":true}}\n",
            "{\"kind\":\"keydown\",\"at_ms\":300,\"key\":\"x\",\"modifiers\":{\"ctrl\":true}}\n",
        ),
    );

    let mut config = config_for(trace, output_path.clone());
    config.allow_context_menu = true;
    config.blocked_keys = vec!["x".to_string()];

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = SuppressionPipeline::new(storage, config);
    let engine = ReplayEngine::new(pipeline);

    let result = engine.run().await;
    assert!(result.is_ok());

    let full_path = std::path::Path::new(&output_path).join("guard_report.zip");
    let zip_data = std::fs::read(&full_path).unwrap();
    let cursor = std::io::Cursor::new(zip_data);
    let mut archive = zip::ZipArchive::new(cursor).unwrap();

    let mut json_file = archive.by_name("report.json").unwrap();
    let mut json_content = String::new();
    std::io::Read::read_to_string(&mut json_file, &mut json_content).unwrap();

    // Only ctrl+x is suppressed under the custom policy
    let report: serde_json::Value = serde_json::from_str(&json_content).unwrap();
    assert_eq!(report["summary"]["total_events"], 3);
    assert_eq!(report["summary"]["suppressed"], 1);
    assert_eq!(report["summary"]["context_menu_blocked"], 0);
    assert_eq!(report["summary"]["shortcuts_blocked"], 1);
}

#[tokio::test]
async fn test_report_omits_suppressed_member_when_nothing_blocked() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let trace = write_trace(
        &temp_dir,
        "quiet.jsonl",
        concat!(
            "{\"kind\":\"keydown\",\"at_ms\":100,\"key\":\"a\",\"modifiers\":{\"ctrl\":true}}\n",
            "{\"kind\":\"keydown\",\"at_ms\":200,\"key\":\"s\"}\n",
            "{\"kind\":\"click\",\"at_ms\":300}\n",
        ),
    );

    let config = config_for(trace, output_path.clone());
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = SuppressionPipeline::new(storage, config);
    let engine = ReplayEngine::new(pipeline);

    let result = engine.run().await;
    assert!(result.is_ok());

    let full_path = std::path::Path::new(&output_path).join("guard_report.zip");
    let zip_data = std::fs::read(&full_path).unwrap();
    let cursor = std::io::Cursor::new(zip_data);
    let mut archive = zip::ZipArchive::new(cursor).unwrap();

    let file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();

    assert_eq!(file_names.len(), 2);
    assert!(file_names.contains(&"report.csv".to_string()));
    assert!(file_names.contains(&"report.json".to_string()));
    assert!(!file_names.contains(&"suppressed.json".to_string()));
}
