//! Parser for the TMDB 5000 CSV files.
//!
//! - tmdb_5000_movies.csv: title, overview, genres, keywords (plus columns we ignore)
//! - tmdb_5000_credits.csv: movie_id, title, cast, crew
//!
//! Parsing happens in three steps:
//! 1. Read each file into raw rows (`MovieRow`, `CreditRow`)
//! 2. Inner-join the rows on `title`
//! 3. Validate each joined row into a `MovieRecord`, or reject it

use crate::error::{DataLoadError, RecordRejection, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Read every row of a CSV file into `T`.
///
/// Rows whose cells don't fit `T` are skipped; structural problems
/// (bad header, wrong number of fields) abort the whole file.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file_label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;

    let mut reader = csv::Reader::from_reader(file);
    reader.headers().map_err(|source| DataLoadError::Csv {
        file: file_label.clone(),
        source,
    })?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                let skippable = matches!(
                    e.kind(),
                    csv::ErrorKind::Deserialize { .. } | csv::ErrorKind::Utf8 { .. }
                );
                if skippable {
                    debug!("Skipping unreadable row at line {} in {}: {}", line, file_label, e);
                    continue;
                }
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    return Err(DataLoadError::Csv {
                        file: file_label,
                        source: e,
                    });
                }
                return Err(DataLoadError::ParseError {
                    file: file_label,
                    line,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(rows)
}

/// Parse the movies file
pub fn parse_movie_rows(path: &Path) -> Result<Vec<MovieRow>> {
    read_rows(path)
}

/// Parse the credits file
pub fn parse_credit_rows(path: &Path) -> Result<Vec<CreditRow>> {
    read_rows(path)
}

/// Inner join of movies and credits on `title`.
///
/// Output follows the movies file order. A title that appears in several
/// credit rows yields one joined row per credit row, in credits order.
/// Rows without a title can't be matched and are left out.
pub fn join_on_title(movies: Vec<MovieRow>, credits: Vec<CreditRow>) -> Vec<JoinedRow> {
    let mut credits_by_title: HashMap<String, Vec<CreditRow>> = HashMap::new();
    for credit in credits {
        if let Some(title) = credit.title.clone() {
            credits_by_title.entry(title).or_default().push(credit);
        }
    }

    let mut joined = Vec::new();
    for movie in movies {
        let Some(title) = movie.title.as_deref() else {
            continue;
        };
        let Some(matches) = credits_by_title.get(title) else {
            continue;
        };
        for credit in matches {
            joined.push(JoinedRow {
                movie_id: credit.movie_id,
                title: movie.title.clone(),
                overview: movie.overview.clone(),
                genres: movie.genres.clone(),
                keywords: movie.keywords.clone(),
                cast: credit.cast.clone(),
                crew: credit.crew.clone(),
            });
        }
    }
    joined
}

/// Validate a joined row into a `MovieRecord`.
///
/// Every column is required. The sub-record columns must be JSON arrays
/// of name-bearing entries; anything else rejects the row.
pub fn into_record(row: JoinedRow) -> std::result::Result<MovieRecord, RecordRejection> {
    let id = row.movie_id.ok_or(RecordRejection::MissingField("movie_id"))?;
    let title = row.title.ok_or(RecordRejection::MissingField("title"))?;
    let overview = row.overview.ok_or(RecordRejection::MissingField("overview"))?;
    let genres = row.genres.ok_or(RecordRejection::MissingField("genres"))?;
    let keywords = row.keywords.ok_or(RecordRejection::MissingField("keywords"))?;
    let cast = row.cast.ok_or(RecordRejection::MissingField("cast"))?;
    let crew = row.crew.ok_or(RecordRejection::MissingField("crew"))?;

    Ok(MovieRecord {
        id,
        title,
        overview,
        genres: parse_names("genres", &genres)?,
        keywords: parse_names("keywords", &keywords)?,
        cast: parse_cast(&cast)?,
        director: parse_director(&crew)?,
    })
}

fn parse_json<T: DeserializeOwned>(
    field: &'static str,
    raw: &str,
) -> std::result::Result<Vec<T>, RecordRejection> {
    serde_json::from_str(raw).map_err(|e| RecordRejection::MalformedField {
        field,
        reason: e.to_string(),
    })
}

/// `[{"id": 28, "name": "Action"}, ...]` -> `["Action", ...]`
fn parse_names(field: &'static str, raw: &str) -> std::result::Result<Vec<String>, RecordRejection> {
    let entries: Vec<NamedEntry> = parse_json(field, raw)?;
    Ok(entries.into_iter().map(|entry| entry.name).collect())
}

/// Names of the first `MAX_BILLED_CAST` cast entries
fn parse_cast(raw: &str) -> std::result::Result<Vec<String>, RecordRejection> {
    let entries: Vec<CastEntry> = parse_json("cast", raw)?;
    Ok(entries
        .into_iter()
        .take(MAX_BILLED_CAST)
        .map(|entry| entry.name)
        .collect())
}

/// Name of the first crew entry whose job is "Director"
fn parse_director(raw: &str) -> std::result::Result<Option<String>, RecordRejection> {
    let entries: Vec<CrewEntry> = parse_json("crew", raw)?;
    Ok(entries
        .into_iter()
        .find(|entry| entry.job == DIRECTOR_JOB)
        .map(|entry| entry.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_row(title: &str) -> MovieRow {
        MovieRow {
            title: Some(title.to_string()),
            overview: Some(format!("{} overview", title)),
            genres: Some(r#"[{"id": 28, "name": "Action"}]"#.to_string()),
            keywords: Some(r#"[{"id": 1, "name": "space war"}]"#.to_string()),
        }
    }

    fn credit_row(id: MovieId, title: &str) -> CreditRow {
        CreditRow {
            movie_id: Some(id),
            title: Some(title.to_string()),
            cast: Some(r#"[{"name": "Sam Worthington", "order": 0}]"#.to_string()),
            crew: Some(r#"[{"job": "Director", "name": "James Cameron"}]"#.to_string()),
        }
    }

    #[test]
    fn test_join_preserves_movie_order() {
        let movies = vec![movie_row("B"), movie_row("A"), movie_row("C")];
        let credits = vec![credit_row(1, "A"), credit_row(2, "B")];

        let joined = join_on_title(movies, credits);

        let titles: Vec<_> = joined.iter().map(|r| r.title.clone().unwrap()).collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert_eq!(joined[0].movie_id, Some(2));
    }

    #[test]
    fn test_join_duplicates_every_match() {
        let movies = vec![movie_row("Twin")];
        let credits = vec![credit_row(7, "Twin"), credit_row(8, "Twin")];

        let joined = join_on_title(movies, credits);

        let ids: Vec<_> = joined.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![Some(7), Some(8)]);
    }

    #[test]
    fn test_join_skips_rows_without_title() {
        let mut untitled = movie_row("x");
        untitled.title = None;
        let joined = join_on_title(vec![untitled], vec![credit_row(1, "x")]);
        assert!(joined.is_empty());
    }

    #[test]
    fn test_into_record_parses_sub_records() {
        let joined = join_on_title(vec![movie_row("Avatar")], vec![credit_row(19995, "Avatar")]);
        let record = into_record(joined[0].clone()).unwrap();

        assert_eq!(record.id, 19995);
        assert_eq!(record.genres, vec!["Action"]);
        assert_eq!(record.keywords, vec!["space war"]);
        assert_eq!(record.cast, vec!["Sam Worthington"]);
        assert_eq!(record.director.as_deref(), Some("James Cameron"));
    }

    #[test]
    fn test_into_record_rejects_missing_overview() {
        let mut row = join_on_title(vec![movie_row("A")], vec![credit_row(1, "A")]).remove(0);
        row.overview = None;
        assert_eq!(
            into_record(row).unwrap_err(),
            RecordRejection::MissingField("overview")
        );
    }

    #[test]
    fn test_into_record_rejects_malformed_json() {
        let mut row = join_on_title(vec![movie_row("A")], vec![credit_row(1, "A")]).remove(0);
        row.genres = Some("not a list".to_string());
        assert!(matches!(
            into_record(row),
            Err(RecordRejection::MalformedField { field: "genres", .. })
        ));
    }

    #[test]
    fn test_parse_cast_keeps_top_three() {
        let raw = r#"[{"name": "A"}, {"name": "B"}, {"name": "C"}, {"name": "D"}]"#;
        assert_eq!(parse_cast(raw).unwrap(), vec!["A", "B", "C"]);
        assert_eq!(parse_cast("[]").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_cast_entry_order_is_optional() {
        let entries: Vec<CastEntry> =
            serde_json::from_str(r#"[{"name": "A", "order": 0, "character": "X"}, {"name": "B"}]"#)
                .unwrap();
        assert_eq!(entries[0].order, Some(0));
        assert_eq!(entries[1].order, None);
    }

    #[test]
    fn test_parse_cast_uses_list_position() {
        let raw = r#"[
            {"name": "A", "order": 3},
            {"name": "B", "order": 0},
            {"name": "C", "order": 2},
            {"name": "D", "order": 1}
        ]"#;
        assert_eq!(parse_cast(raw).unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_parse_director_takes_first_director() {
        let raw = r#"[
            {"job": "Producer", "name": "P"},
            {"job": "Director", "name": "First"},
            {"job": "Director", "name": "Second"}
        ]"#;
        assert_eq!(parse_director(raw).unwrap().as_deref(), Some("First"));

        let no_director = r#"[{"job": "Editor", "name": "E"}]"#;
        assert_eq!(parse_director(no_director).unwrap(), None);
    }
}
