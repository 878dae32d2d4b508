use clap::Parser;
use newsprep::{run, Cli};
use newsprep_core::persist::load_gold_file;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn build_corpus(root: &Path) {
    fs::create_dir_all(root.join("rec.autos")).unwrap();
    fs::create_dir_all(root.join("sci.med")).unwrap();
    fs::write(root.join("rec.autos/101"), "From: a@b.c\nSubject: brakes\n  (long)\n\nCheck the pads first.\n").unwrap();
    fs::write(root.join("sci.med/202"), "Path: x!y\nFrom: d@e.f\nVitamin C does not cure colds.\n").unwrap();
}

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("newsprep").chain(args.iter().copied())).unwrap()
}

#[test]
fn strip_writes_flat_output_and_report() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    build_corpus(&corpus);
    let patterns = dir.path().join("headers.txt");
    fs::write(&patterns, "From:\nSubject:\nPath:\n").unwrap();
    let out = dir.path().join("clean");
    let report = dir.path().join("report.json");

    run(cli(&[
        "strip",
        "--input", corpus.to_str().unwrap(),
        "--output", out.to_str().unwrap(),
        "--patterns", patterns.to_str().unwrap(),
        "--report", report.to_str().unwrap(),
    ]))
    .unwrap();

    assert_eq!(fs::read_to_string(out.join("101")).unwrap(), "\nCheck the pads first.\n");
    assert_eq!(fs::read_to_string(out.join("202")).unwrap(), "Vitamin C does not cure colds.\n");
    let json: Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["files"], 2);
    assert_eq!(json["lines_dropped"], 5);
}

#[test]
fn strip_fails_on_missing_pattern_file() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    build_corpus(&corpus);
    let out = dir.path().join("clean");

    let err = run(cli(&[
        "strip",
        "--input", corpus.to_str().unwrap(),
        "--output", out.to_str().unwrap(),
        "--patterns", dir.path().join("missing.txt").to_str().unwrap(),
    ]))
    .unwrap_err();
    assert!(err.to_string().contains("loading header patterns"));
    assert!(!out.exists());
}

#[test]
fn keep_going_still_reports_failure() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    build_corpus(&corpus);
    let patterns = dir.path().join("headers.txt");
    fs::write(&patterns, "From:\n").unwrap();
    let out = dir.path().join("clean");
    fs::create_dir_all(out.join("101")).unwrap();

    let err = run(cli(&[
        "strip",
        "--input", corpus.to_str().unwrap(),
        "--output", out.to_str().unwrap(),
        "--patterns", patterns.to_str().unwrap(),
        "--keep-going",
    ]))
    .unwrap_err();
    assert!(err.to_string().contains("1 file(s) failed"));
    assert!(out.join("202").is_file());
}

#[test]
fn gold_writes_json_file() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    build_corpus(&corpus);
    let gold_path = dir.path().join("gold.json");

    run(cli(&["gold", "--input", corpus.to_str().unwrap(), "--output", gold_path.to_str().unwrap(), "--sorted"])).unwrap();

    let gold = load_gold_file(&gold_path).unwrap();
    assert_eq!(gold.num_topics, 2);
    assert_eq!(gold.topics.get("rec.autos"), Some(&[101][..]));
    assert_eq!(gold.topics.get("sci.med"), Some(&[202][..]));
}

#[test]
fn parses_strip_defaults() {
    let parsed = cli(&["strip", "--input", "in", "--output", "out"]);
    match parsed.command {
        newsprep::Commands::Strip { patterns, keep_going, by_topic, sorted, report, .. } => {
            // NEWSPREP_PATTERNS may be set in the environment running the tests.
            if std::env::var_os("NEWSPREP_PATTERNS").is_none() {
                assert_eq!(patterns, Path::new("./data/headers.txt"));
            }
            assert!(!keep_going && !by_topic && !sorted);
            assert!(report.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
