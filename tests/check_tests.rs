use std::fs;
use tempfile::tempdir;
use twin_parser::{check, CheckArgs, FindingKind, ParserArgs, TwinError};

fn args_for(pattern: String) -> CheckArgs {
    CheckArgs {
        input: vec![pattern],
        exclude: vec![],
        output: None,
        jobs: Some(2),
        parser: ParserArgs::default(),
        verbose: true,
    }
}

#[test]
fn test_check_reports_findings_per_file() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("good.tw"), "md:(p-2 m-1) hover:underline").unwrap();
    fs::write(temp_dir.path().join("bad.tw"), "flex\nlg:(bg-red").unwrap();

    let mut args = args_for(format!("{}/*.tw", temp_dir.path().display()));
    let output = temp_dir.path().join("out/report.json");
    args.output = Some(output.clone());

    let report = check(&args).unwrap();
    assert_eq!(report.metadata.files_checked, 2);
    assert_eq!(report.metadata.findings, 1);
    assert!(report.has_findings());

    let (path, bad) = report
        .files
        .iter()
        .find(|(path, _)| path.ends_with("bad.tw"))
        .unwrap();
    assert!(path.contains("bad.tw"));
    assert_eq!(bad.items, 1);
    assert_eq!(bad.findings[0].kind, FindingKind::NotClosed);
    assert_eq!(bad.findings[0].location(), "2:4");
    assert_eq!(bad.findings[0].variants, vec!["lg"]);

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["metadata"]["findings"], 1);
    assert_eq!(written["statistics"]["by_kind"]["notClosed"], 1);
}

#[test]
fn test_check_respects_exclude() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("keep.tw"), "flex").unwrap();
    fs::write(temp_dir.path().join("skip.tw"), "lg:(").unwrap();

    let mut args = args_for(format!("{}/*.tw", temp_dir.path().display()));
    args.exclude = vec![format!("{}/skip.tw", temp_dir.path().display())];

    let report = check(&args).unwrap();
    assert_eq!(report.metadata.files_checked, 1);
    assert!(!report.has_findings());
}

#[test]
fn test_check_reports_unknown_tokens() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("a.tw"), "p-1 ))").unwrap();

    let report = check(&args_for(format!("{}/*.tw", temp_dir.path().display()))).unwrap();
    let file = report.files.values().next().unwrap();
    assert_eq!(file.findings.len(), 1);
    assert_eq!(file.findings[0].kind, FindingKind::Unknown);
    assert_eq!(file.findings[0].text, "))");
}

#[test]
fn test_check_no_files() {
    let temp_dir = tempdir().unwrap();
    let result = check(&args_for(format!("{}/*.none", temp_dir.path().display())));
    assert!(matches!(result, Err(TwinError::NoFilesFound)));
}

#[test]
fn test_check_uses_config_separator() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("a.tw"), "hover_(a b)").unwrap();
    let config = temp_dir.path().join("twin.yaml");
    fs::write(&config, "separator: \"_\"\n").unwrap();

    let mut args = args_for(format!("{}/*.tw", temp_dir.path().display()));
    args.parser.config = Some(config);

    let report = check(&args).unwrap();
    assert_eq!(report.metadata.separator, "_");
    let file = report.files.values().next().unwrap();
    assert_eq!(file.items, 2);
    assert!(file.findings.is_empty());
}

#[test]
fn test_check_rejects_zero_jobs() {
    let mut args = args_for("*.tw".to_string());
    args.jobs = Some(0);
    assert!(matches!(check(&args), Err(TwinError::InvalidInput(_))));
}
