// 🏗️ Parser Framework
// Delimited-text parser for the published client / account / branch sheets

use serde::{Deserialize, Serialize};
use std::mem;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Field boundary used by the published sheets
pub const DEFAULT_DELIMITER: char = ',';

/// Quote character wrapping fields that contain the delimiter
pub const QUOTE: char = '"';

/// QuoteMode - How quote characters are interpreted during the row scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteMode {
    /// Every quote toggles the "inside quotes" flag and is dropped.
    /// A literal quote can't be represented.
    #[default]
    Toggle,

    /// `""` inside a quoted field is a literal quote (RFC 4180 style).
    Doubled,
}

/// FieldMap - One parsed row: header → raw cell text, in column order
///
/// This is the "raw" representation before coercion. A header with no
/// matching cell (short row) maps to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    /// 1-based line in the source document (header is line 1)
    pub line_number: usize,

    entries: Vec<(String, Option<String>)>,
}

impl FieldMap {
    pub fn new(line_number: usize) -> Self {
        FieldMap {
            line_number,
            entries: Vec::new(),
        }
    }

    /// Builder pattern: append a column
    pub fn with_field(mut self, header: &str, value: Option<&str>) -> Self {
        self.insert(header.to_string(), value.map(str::to_string));
        self
    }

    pub fn insert(&mut self, header: String, value: Option<String>) {
        self.entries.push((header, value));
    }

    /// Cell text for a header. When a header repeats, the later column wins.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(h, _)| h == header)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(h, _)| h.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// DELIMITED PARSER
// ============================================================================

/// DelimitedParser - raw text → ordered sequence of FieldMaps
///
/// The first line is the header row. Every following non-blank line becomes
/// one FieldMap. Parsing never fails: a malformed row still produces a
/// record, with missing trailing cells left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedParser {
    delimiter: char,
    quote_mode: QuoteMode,
}

impl DelimitedParser {
    pub fn new() -> Self {
        DelimitedParser {
            delimiter: DEFAULT_DELIMITER,
            quote_mode: QuoteMode::Toggle,
        }
    }

    /// Builder pattern: change the field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: change how quotes are read
    pub fn with_quote_mode(mut self, quote_mode: QuoteMode) -> Self {
        self.quote_mode = quote_mode;
        self
    }

    /// Parse a whole document
    ///
    /// # Example:
    /// ```
    /// use client_ledger::parser::DelimitedParser;
    ///
    /// let rows = DelimitedParser::new().parse("a,b,c\n\"x,y\",z,\"w\"");
    /// assert_eq!(rows[0].get("a"), Some("x,y"));
    /// assert_eq!(rows[0].get("b"), Some("z"));
    /// assert_eq!(rows[0].get("c"), Some("w"));
    /// ```
    pub fn parse(&self, text: &str) -> Vec<FieldMap> {
        let mut lines = text.split('\n');

        let headers = match lines.next() {
            Some(line) => self.parse_header(line),
            None => return Vec::new(),
        };

        lines
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                let values = self.split_row(line);
                let mut row = FieldMap::new(idx + 2); // +2 because: 1-indexed + header row

                for (pos, header) in headers.iter().enumerate() {
                    row.insert(header.clone(), values.get(pos).cloned());
                }

                row
            })
            .collect()
    }

    /// Header tokens are split naively on the delimiter (quotes don't protect it)
    pub fn parse_header(&self, line: &str) -> Vec<String> {
        line.split(self.delimiter)
            .map(|token| strip_quotes(token).trim().to_string())
            .collect()
    }

    /// Split one data row into cleaned cell values
    ///
    /// A row with N delimiters outside quotes always yields N+1 values.
    pub fn split_row(&self, line: &str) -> Vec<String> {
        match self.quote_mode {
            QuoteMode::Toggle => self
                .scan_toggle(line)
                .into_iter()
                .map(|value| strip_quotes(&value).trim().to_string())
                .collect(),
            QuoteMode::Doubled => self
                .scan_doubled(line)
                .into_iter()
                .map(|value| value.trim().to_string())
                .collect(),
        }
    }

    fn scan_toggle(&self, line: &str) -> Vec<String> {
        let mut values = Vec::new();
        let mut current = String::new();
        let mut inside_quotes = false;

        for ch in line.chars() {
            if ch == QUOTE {
                inside_quotes = !inside_quotes;
            } else if ch == self.delimiter && !inside_quotes {
                values.push(mem::take(&mut current));
            } else {
                current.push(ch);
            }
        }
        values.push(current);

        values
    }

    fn scan_doubled(&self, line: &str) -> Vec<String> {
        let mut values = Vec::new();
        let mut current = String::new();
        let mut inside_quotes = false;
        let mut chars = line.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch == QUOTE {
                if inside_quotes && chars.peek() == Some(&QUOTE) {
                    current.push(QUOTE);
                    chars.next();
                } else {
                    inside_quotes = !inside_quotes;
                }
            } else if ch == self.delimiter && !inside_quotes {
                values.push(mem::take(&mut current));
            } else {
                current.push(ch);
            }
        }
        values.push(current);

        values
    }
}

impl Default for DelimitedParser {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_quotes(value: &str) -> String {
    value.replace(QUOTE, "")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_field_keeps_delimiter() {
        let rows = DelimitedParser::new().parse("a,b,c\n\"x,y\",z,\"w\"");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("a"), Some("x,y"));
        assert_eq!(rows[0].get("b"), Some("z"));
        assert_eq!(rows[0].get("c"), Some("w"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let rows = DelimitedParser::new().parse("a,b\n\n1,2\n   \n");

        assert_eq!(rows.len(), 1, "Only the data line should produce a record");
        assert_eq!(rows[0].get("a"), Some("1"));
        assert_eq!(rows[0].line_number, 3);
    }

    #[test]
    fn test_header_tokens_are_cleaned() {
        let parser = DelimitedParser::new();
        let headers = parser.parse_header("\"id\", \"nome\" ,email\r");

        assert_eq!(headers, vec!["id", "nome", "email"]);
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_last_field() {
        let parser = DelimitedParser::new();
        let values = parser.split_row("1,2,");

        assert_eq!(values, vec!["1", "2", ""]);
    }

    #[test]
    fn test_short_row_leaves_missing_headers_unset() {
        let rows = DelimitedParser::new().parse("a,b,c\n1");

        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0].get("a"), Some("1"));
        assert_eq!(rows[0].get("b"), None);
        assert_eq!(rows[0].get("c"), None);
    }

    #[test]
    fn test_surplus_fields_are_dropped() {
        let rows = DelimitedParser::new().parse("a,b\n1,2,3,4");

        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0].get("b"), Some("2"));
    }

    #[test]
    fn test_field_count_matches_header_count() {
        let text = "id,nome,endereco,cidade\n\
                    1,Ana,\"Rua A, 10\",Vitória\n\
                    2,\"Silva, Bruno\",\"Av. B, 200, apto 3\",\"Serra\"\n\
                    3,Carla,Rua C,\"Vila Velha\"";
        let rows = DelimitedParser::new().parse(text);

        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.len(), 4);
            assert!(row.headers().all(|h| row.get(h).is_some()));
        }
        assert_eq!(rows[1].get("nome"), Some("Silva, Bruno"));
        assert_eq!(rows[1].get("endereco"), Some("Av. B, 200, apto 3"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let rows = DelimitedParser::new().parse("a,b\r\n1,2\r\n3,4\r\n");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("b"), Some("2"));
        assert_eq!(rows[1].get("b"), Some("4"));
    }

    #[test]
    fn test_values_are_trimmed() {
        let rows = DelimitedParser::new().parse("a,b\n  1 , \" 2 \" ");

        assert_eq!(rows[0].get("a"), Some("1"));
        assert_eq!(rows[0].get("b"), Some("2"));
    }

    #[test]
    fn test_toggle_mode_drops_doubled_quotes() {
        let parser = DelimitedParser::new();
        let values = parser.split_row("\"say \"\"hi\"\"\",x");

        assert_eq!(values, vec!["say hi", "x"]);
    }

    #[test]
    fn test_doubled_mode_keeps_literal_quotes() {
        let parser = DelimitedParser::new().with_quote_mode(QuoteMode::Doubled);
        let values = parser.split_row("\"say \"\"hi\"\"\",\"a,b\",\"\"");

        assert_eq!(values, vec!["say \"hi\"", "a,b", ""]);
    }

    #[test]
    fn test_custom_delimiter() {
        let parser = DelimitedParser::new().with_delimiter(';');
        let rows = parser.parse("a;b\n\"1;5\";2,5");

        assert_eq!(rows[0].get("a"), Some("1;5"));
        assert_eq!(rows[0].get("b"), Some("2,5"));
    }

    #[test]
    fn test_empty_and_header_only_documents() {
        let parser = DelimitedParser::new();

        assert!(parser.parse("").is_empty());
        assert!(parser.parse("a,b,c").is_empty());
        assert!(parser.parse("a,b,c\n").is_empty());
    }

    #[test]
    fn test_repeated_header_later_column_wins() {
        let rows = DelimitedParser::new().parse("id,id\n1,2");

        assert_eq!(rows[0].get("id"), Some("2"));
    }

    #[test]
    fn test_line_numbers_follow_source() {
        let rows = DelimitedParser::new().parse("a\n1\n\n2\n3");
        let lines: Vec<usize> = rows.iter().map(|r| r.line_number).collect();

        assert_eq!(lines, vec![2, 4, 5]);
    }

    #[test]
    fn test_field_map_builder() {
        let row = FieldMap::new(7)
            .with_field("id", Some("42"))
            .with_field("nome", None);

        assert_eq!(row.line_number, 7);
        assert_eq!(row.get("id"), Some("42"));
        assert_eq!(row.get("nome"), None);
        assert_eq!(row.get("absent"), None);
        assert_eq!(row.headers().collect::<Vec<_>>(), vec!["id", "nome"]);
    }
}
