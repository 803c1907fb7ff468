mod support;

use directory_export::{Command, ExportConfig, FileNaming, run_command};
use serde_json::Value;
use std::fs;
use std::path::Path;
use support::{matter, png, submission};

fn config_in(dir: &Path) -> ExportConfig {
    ExportConfig {
        output_dir: dir.join("out"),
        file_naming: FileNaming::ContentHash,
        ..ExportConfig::default()
    }
}

fn run(config: &ExportConfig, command: Command) -> (bool, String) {
    let mut out = Vec::new();
    let ok = run_command(config, &command, &mut out).expect("command runs");
    (ok, String::from_utf8(out).expect("utf-8 output"))
}

#[test]
fn templates_lists_builtin_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let (ok, out) = run(&config_in(dir.path()), Command::Templates);
    assert!(ok);
    let ids = out
        .lines()
        .map(|line| line.split('\t').next().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(ids, ["chambers-2024", "legal500-2024", "duns100-2024"]);
    assert!(out.contains("duns100-2024\tduns_100\txlsx\t2024.1"));
}

#[test]
fn templates_include_extra_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("extra.json");
    fs::write(
        &catalog,
        r#"{ "templates": [ { "id": "firm-profile", "name": "Firm Profile", "type": "custom",
             "outputFormat": "docx", "version": "1",
             "fields": [ { "name": "title", "label": "Title", "type": "text", "mappedFrom": "title" } ] } ] }"#,
    )
    .unwrap();
    let config = ExportConfig {
        templates_file: Some(catalog),
        ..config_in(dir.path())
    };
    let (_, out) = run(&config, Command::Templates);
    assert!(out.lines().last().unwrap().starts_with("firm-profile\tcustom\tdocx"));
}

#[test]
fn invalid_catalog_schema_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("bad.yaml");
    fs::write(
        &catalog,
        "templates:\n  - id: bad\n    name: Bad\n    type: custom\n    outputFormat: docx\n    fields:\n      - name: pick\n        label: Pick\n        type: select\n",
    )
    .unwrap();
    let config = ExportConfig {
        templates_file: Some(catalog),
        ..config_in(dir.path())
    };
    let mut out = Vec::new();
    let err = run_command(&config, &Command::Templates, &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("has no options"));
}

#[test]
fn validate_prints_result_and_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("matter.yaml");
    fs::write(&input, "title: Deal\n").unwrap();

    let (ok, out) = run(
        &config_in(dir.path()),
        Command::Validate {
            template: "chambers-2024".into(),
            input,
        },
    );
    assert!(!ok);
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(json["missingFields"], serde_json::json!(["clientName"]));
}

#[test]
fn generate_writes_document_to_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("matter.json");
    fs::write(&input, serde_json::to_string(&matter()).unwrap()).unwrap();
    let overrides = dir.path().join("overrides.json");
    fs::write(&overrides, r#"{ "clientName": "Acme", "leadPartner": null }"#).unwrap();

    let (ok, out) = run(
        &config_in(dir.path()),
        Command::Generate {
            template: "chambers-2024".into(),
            input,
            overrides: Some(overrides),
        },
    );
    assert!(ok);
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["success"], true);
    assert!(json.get("buffer").is_none());
    let path = json["path"].as_str().unwrap();
    let bytes = fs::read(path).unwrap();
    assert!(support::document_xml(&bytes).contains(">Acme<"));
    assert!(path.ends_with(json["fileName"].as_str().unwrap()));
}

#[test]
fn failed_generation_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("matter.json");
    fs::write(&input, "{}").unwrap();
    let config = config_in(dir.path());

    let (ok, out) = run(
        &config,
        Command::Generate {
            template: "legal500-2024".into(),
            input,
            overrides: None,
        },
    );
    assert!(!ok);
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["errors"].as_array().unwrap().len(), 3);
    assert!(!config.output_dir.exists());
}

#[test]
fn submission_embeds_configured_logo() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("submission.json");
    fs::write(&input, serde_json::to_string(&submission()).unwrap()).unwrap();
    let logo = dir.path().join("logo.png");
    fs::write(&logo, png(10, 10)).unwrap();

    let config = ExportConfig {
        logo: Some(logo.clone()),
        ..config_in(dir.path())
    };
    let (ok, out) = run(
        &config,
        Command::Submission {
            input,
            logo: Some(logo),
        },
    );
    assert!(ok);
    let json: Value = serde_json::from_str(&out).unwrap();
    let bytes = fs::read(json["path"].as_str().unwrap()).unwrap();
    let rels = support::docx_part(&bytes, "word/_rels/document.xml.rels");
    assert!(rels.contains("media/logo.png"));
}
