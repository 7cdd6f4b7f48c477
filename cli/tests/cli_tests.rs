use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

fn write_fixtures(dir: &Path) {
    let movies = serde_json::json!({
        "movies": [
            {"id": 1, "title": "The Great Escape", "description": "A prison break film"},
            {"id": 2, "title": "Escape from Alcatraz", "description": "An island prison"},
            {"id": 3, "title": "Heat", "description": "A crime saga"}
        ]
    });
    fs::write(dir.join("movies.json"), movies.to_string()).unwrap();
    fs::write(dir.join("stopwords.txt"), "the\na\nan\nfrom\n").unwrap();
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_keyword-search"))
        .arg("--movies")
        .arg(dir.join("movies.json"))
        .arg("--stopwords")
        .arg(dir.join("stopwords.txt"))
        .arg("--cache-dir")
        .arg(dir.join("cache"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn built() -> TempDir {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    let out = run(dir.path(), &["build"]);
    assert!(out.status.success(), "build failed: {}", String::from_utf8_lossy(&out.stderr));
    assert!(dir.path().join("cache/index.bin").exists());
    dir
}

#[test]
fn query_before_build_asks_for_build() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    let out = run(dir.path(), &["idf", "escape"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Index file not found. Please build the index first."));
}

#[test]
fn term_statistics() {
    let dir = built();
    let out = run(dir.path(), &["tf", "1", "escape"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "Term frequency of 'escape' in document 1: 1");

    let out = run(dir.path(), &["idf", "escape"]);
    assert_eq!(stdout(&out).trim(), "Inverse document frequency of 'escape': 0.29");

    let out = run(dir.path(), &["tfidf", "3", "escape"]);
    assert_eq!(stdout(&out).trim(), "TF-IDF score of 'escape' in document 3: 0.00");

    let out = run(dir.path(), &["bm25idf", "heat"]);
    assert_eq!(stdout(&out).trim(), "BM25 IDF score of 'heat': 0.98");

    let out = run(dir.path(), &["bm25tf", "3", "heat", "1.2", "0"]);
    assert_eq!(stdout(&out).trim(), "BM25 TF score of 'heat' in document 3: 1.00");
}

#[test]
fn searches() {
    let dir = built();
    let out = run(dir.path(), &["search", "prison"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Searching for: prison\n1. The Great Escape\n2. Escape from Alcatraz\n");

    let out = run(dir.path(), &["search", "--mode", "title", "alcatraz"]);
    assert_eq!(stdout(&out), "Searching for: alcatraz\n1. Escape from Alcatraz\n");

    let out = run(dir.path(), &["bm25search", "crime", "2"]);
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1. (3) Heat - Score: "));
}

#[test]
fn multi_token_term_is_rejected() {
    let dir = built();
    let out = run(dir.path(), &["tf", "1", "great escape"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("single token"));
}

#[test]
fn unknown_document_is_reported() {
    let dir = built();
    let out = run(dir.path(), &["tf", "42", "escape"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("document 42 is not indexed"));
}
