//! Schema description endpoint
//!
//! The first line of the schema file reads `name:type,name:type,...`.

use crate::config::AppState;
use crate::http::response::{build_json_response, HttpResponse};
use crate::logger;
use hyper::StatusCode;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// One column of the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("cannot read schema file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed schema entry '{0}': expected name:type")]
    Malformed(String),
}

/// Split a schema line into fields; every entry needs exactly one colon
pub fn parse_schema_line(line: &str) -> Result<Vec<Field>, SchemaError> {
    line.trim()
        .split(',')
        .map(|item| match item.split_once(':') {
            Some((name, field_type)) if !field_type.contains(':') => Ok(Field {
                name: name.to_string(),
                field_type: field_type.to_string(),
            }),
            _ => Err(SchemaError::Malformed(item.to_string())),
        })
        .collect()
}

/// Read the schema file and parse its first line
pub async fn load_schema(path: &Path) -> Result<Vec<Field>, SchemaError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
    parse_schema_line(content.lines().next().unwrap_or_default())
}

/// `GET /schema`
pub async fn serve_schema(state: &AppState) -> HttpResponse {
    match load_schema(&state.config.database.schema_path()).await {
        Ok(fields) => build_json_response(StatusCode::OK, &fields),
        Err(e) => {
            logger::log_error(&format!("Schema request failed: {e}"));
            build_json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &serde_json::json!({ "error": e.to_string() }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields_in_order() {
        let fields = parse_schema_line("id:int,name:string").expect("parse");
        let json = serde_json::to_string(&fields).expect("json");
        assert_eq!(
            json,
            r#"[{"name":"id","type":"int"},{"name":"name","type":"string"}]"#
        );
    }

    #[test]
    fn test_line_is_trimmed_but_items_are_not() {
        let fields = parse_schema_line("  id:int, name:char\r\n").expect("parse");
        assert_eq!(fields[0].name, "id");
        assert_eq!(fields[1].name, " name");
        assert_eq!(fields[1].field_type, "char");
    }

    #[test]
    fn test_empty_line_is_malformed() {
        assert!(matches!(
            parse_schema_line(""),
            Err(SchemaError::Malformed(item)) if item.is_empty()
        ));
    }

    #[test]
    fn test_entry_needs_exactly_one_colon() {
        assert!(parse_schema_line("id:int,name").is_err());
        assert!(parse_schema_line("id:int:extra").is_err());
        assert!(parse_schema_line("id:int,").is_err());
        // Empty halves are still one colon
        assert_eq!(
            parse_schema_line("id:").expect("parse"),
            vec![Field {
                name: "id".to_string(),
                field_type: String::new()
            }]
        );
    }

    #[tokio::test]
    async fn test_load_uses_first_line_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("schema.txt");
        std::fs::write(&path, "id:int,name:string\nthis line is ignored\n").expect("write");

        let fields = load_schema(&path).await.expect("load");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].field_type, "string");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_schema(&dir.path().join("absent.txt"))
            .await
            .expect_err("missing");
        assert!(matches!(err, SchemaError::Io { .. }));
    }
}
