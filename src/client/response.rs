// Query responses
// The endpoint answers with {"result": [...]} or {"error": "..."}

use serde_json::{Map, Value};

/// A decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResponse {
    /// Result rows, one JSON object per row
    Result(Vec<Map<String, Value>>),
    /// The endpoint reported an error
    Error(String),
    /// Any other JSON body
    Other(Value),
}

impl QueryResponse {
    pub fn from_value(value: Value) -> Self {
        if let Value::Object(map) = &value {
            if let Some(Value::String(message)) = map.get("error") {
                return QueryResponse::Error(message.clone());
            }
            if let Some(Value::Array(items)) = map.get("result") {
                let rows: Option<Vec<_>> = items
                    .iter()
                    .map(|item| item.as_object().cloned())
                    .collect();
                if let Some(rows) = rows {
                    return QueryResponse::Result(rows);
                }
            }
        }
        QueryResponse::Other(value)
    }

    /// Format using the keys of the first row, in the order the server sent them
    pub fn format(&self) -> String {
        let columns: Vec<String> = match self {
            QueryResponse::Result(rows) => rows
                .first()
                .map(|row| row.keys().cloned().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        self.format_with(&columns)
    }

    /// Format as a text table with the given column order
    pub fn format_with(&self, column_names: &[String]) -> String {
        match self {
            QueryResponse::Error(message) => format!("Error: {}", message),
            QueryResponse::Other(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            QueryResponse::Result(rows) => {
                if rows.is_empty() {
                    return "No rows found".to_string();
                }

                let cells: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| {
                        column_names
                            .iter()
                            .map(|c| row.get(c).map(cell_text).unwrap_or_default())
                            .collect()
                    })
                    .collect();

                // Calculate column widths
                let mut widths: Vec<usize> =
                    column_names.iter().map(|c| c.chars().count()).collect();
                for row in &cells {
                    for (i, value) in row.iter().enumerate() {
                        widths[i] = widths[i].max(value.chars().count());
                    }
                }

                let mut result = String::new();

                result.push_str(&border(&widths, '┌', '┬', '┐'));
                result.push_str(&line(column_names, &widths));
                result.push_str(&border(&widths, '├', '┼', '┤'));
                for row in &cells {
                    result.push_str(&line(row, &widths));
                }
                result.push_str(&border(&widths, '└', '┴', '┘'));

                result.push_str(&format!("\n{} row(s) returned", rows.len()));

                result
            }
        }
    }
}

/// Strings print bare, everything else as JSON
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}\n", left, segments.join(&mid.to_string()), right)
}

fn line(values: &[String], widths: &[usize]) -> String {
    let mut out = String::from("│");
    for (value, width) in values.iter().zip(widths) {
        out.push_str(&format!(" {:<width$} │", value, width = width));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_variants() {
        let ok = QueryResponse::from_value(json!({"result": [{"rooms_name": "DMP_110"}]}));
        assert!(matches!(ok, QueryResponse::Result(ref rows) if rows.len() == 1));

        let err = QueryResponse::from_value(json!({"error": "Invalid query"}));
        assert_eq!(err, QueryResponse::Error("Invalid query".to_string()));

        let other = QueryResponse::from_value(json!({"result": [1, 2]}));
        assert!(matches!(other, QueryResponse::Other(_)));
    }

    #[test]
    fn test_format_table() {
        let response = QueryResponse::from_value(json!({"result": [
            {"courses_dept": "cpsc", "courses_avg": 95.5},
            {"courses_dept": "math", "courses_avg": 97}
        ]}));
        let columns = vec!["courses_dept".to_string(), "courses_avg".to_string()];
        let table = response.format_with(&columns);

        assert!(table.starts_with("┌──────────────┬─────────────┐\n"));
        assert!(table.contains("│ courses_dept │ courses_avg │\n"));
        assert!(table.contains("│ cpsc         │ 95.5        │\n"));
        assert!(table.ends_with("2 row(s) returned"));
    }

    #[test]
    fn test_format_keeps_server_column_order() {
        let text = r#"{"result":[{"courses_dept":"cpsc","courses_avg":95}]}"#;
        let response = QueryResponse::from_value(serde_json::from_str(text).unwrap());
        assert!(response.format().contains("│ courses_dept │ courses_avg │\n"));
    }

    #[test]
    fn test_format_other_as_pretty_json() {
        let response = QueryResponse::from_value(json!({"status": "ok"}));
        assert_eq!(response.format(), "{\n  \"status\": \"ok\"\n}");
    }

    #[test]
    fn test_format_empty_and_error() {
        assert_eq!(QueryResponse::Result(Vec::new()).format(), "No rows found");
        assert_eq!(QueryResponse::Error("Too large".to_string()).format(), "Error: Too large");
    }
}
