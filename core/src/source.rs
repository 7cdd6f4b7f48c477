//! Loaders for the document collection and the stopword list.

use crate::error::Result;
use crate::index::Document;
use crate::tokenizer::Stopwords;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct MoviesFile {
    movies: Vec<Document>,
}

/// Read a `{"movies": [{id, title, description}, ...]}` file, preserving order.
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let file: MoviesFile = serde_json::from_reader(reader)?;
    tracing::debug!(path = %path.as_ref().display(), count = file.movies.len(), "loaded documents");
    Ok(file.movies)
}

/// Parse documents from an in-memory JSON string in the same shape as [`load_documents`].
pub fn parse_documents(json: &str) -> Result<Vec<Document>> {
    let file: MoviesFile = serde_json::from_str(json)?;
    Ok(file.movies)
}

/// Read a newline-delimited stopword list.
pub fn load_stopwords<P: AsRef<Path>>(path: P) -> Result<Stopwords> {
    let text = fs::read_to_string(path.as_ref())?;
    let stopwords = Stopwords::from_text(&text);
    tracing::debug!(path = %path.as_ref().display(), count = stopwords.len(), "loaded stopwords");
    Ok(stopwords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn parses_movies_in_order() {
        let docs = parse_documents(
            r#"{"movies": [
                {"id": 7, "title": "Heat", "description": "Crime."},
                {"id": 2, "title": "Alien", "description": "Space horror."}
            ]}"#,
        )
        .unwrap();
        let ids: Vec<u32> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![7, 2]);
        assert_eq!(docs[1].title, "Alien");
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(matches!(parse_documents(r#"[{"id": 1}]"#), Err(Error::Json(_))));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let movies = dir.path().join("movies.json");
        let stop = dir.path().join("stopwords.txt");
        fs::write(&movies, r#"{"movies": [{"id": 1, "title": "Up", "description": "Balloons"}]}"#).unwrap();
        let mut f = File::create(&stop).unwrap();
        writeln!(f, "the\nand").unwrap();

        assert_eq!(load_documents(&movies).unwrap().len(), 1);
        let sw = load_stopwords(&stop).unwrap();
        assert!(sw.contains("the") && sw.contains("and"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_documents(dir.path().join("nope.json")), Err(Error::Io(_))));
    }
}
