#![warn(clippy::all, rust_2018_idioms)]

//! A small reader for delimited text tables with a header row.
//!
//! Cells are kept as text; callers convert the columns they need. The
//! delimiter (`,`, `;` or tab) is detected from the header line.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("the input contains no header line")]
    Empty,
    #[error("line {line}: expected {expected} cells, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: quoted cell is never closed")]
    UnterminatedQuote { line: usize },
}

/// A parsed table. Every row has exactly as many cells as there are headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// 1-based line numbers of `rows` in the input.
    pub row_lines: Vec<usize>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct Parser {
    // Holds the raw data from reading the file.
    raw_input: String,
    cur_state: State,
}

#[derive(PartialEq, Copy, Clone, Debug)]
enum State {
    StartOfField,
    InUnquoted,
    InQuoted,
    // A quote was read inside a quoted cell: either the closing quote or
    // the first half of an escaped `""`.
    QuoteInQuoted,
    AfterQuoted,
}

impl Parser {
    pub fn from_path(path: &Path) -> Result<Self, std::io::Error> {
        let raw_input = std::fs::read_to_string(path)?;
        Ok(Parser::from_string(raw_input))
    }

    pub fn from_string(raw_input: String) -> Self {
        Self {
            raw_input,
            cur_state: State::StartOfField,
        }
    }

    pub fn parse_table(mut self) -> Result<Table, ParseError> {
        let raw_input = std::mem::take(&mut self.raw_input);
        // A leading byte order mark would end up in the first header.
        let raw_input = raw_input.trim_start_matches('\u{feff}');
        let delimiter = detect_delimiter(raw_input).ok_or(ParseError::Empty)?;
        log::debug!("using delimiter {:?}", delimiter);

        let records = self.walk_input(raw_input, delimiter)?;
        let mut records = records.into_iter();
        let (_, headers) = records.next().ok_or(ParseError::Empty)?;

        let mut rows = Vec::new();
        let mut row_lines = Vec::new();
        for (line, cells) in records {
            if cells.len() != headers.len() {
                return Err(ParseError::RaggedRow {
                    line,
                    expected: headers.len(),
                    found: cells.len(),
                });
            }
            rows.push(cells);
            row_lines.push(line);
        }
        log::debug!("parsed {} columns and {} rows", headers.len(), rows.len());

        Ok(Table {
            headers,
            rows,
            row_lines,
        })
    }

    // Splits the input into records of cells, tagged with the line number
    // the record starts on. Blank lines are skipped. Quoted cells may span
    // several lines.
    fn walk_input(
        &mut self,
        raw_input: &str,
        delimiter: char,
    ) -> Result<Vec<(usize, Vec<String>)>, ParseError> {
        let mut records = Vec::new();
        let mut cells: Vec<String> = Vec::new();
        let mut cell = String::new();
        let mut line_no = 1;
        let mut record_start = 1;
        self.cur_state = State::StartOfField;

        let mut chrs = raw_input.chars().peekable();
        while let Some(chr) = chrs.next() {
            // Normalize "\r\n" to "\n".
            let chr = if chr == '\r' && chrs.peek() == Some(&'\n') {
                continue;
            } else {
                chr
            };

            match self.cur_state {
                State::InQuoted => match chr {
                    '"' => self.cur_state = State::QuoteInQuoted,
                    '\n' => {
                        line_no += 1;
                        cell.push(chr);
                    }
                    _ => cell.push(chr),
                },

                State::QuoteInQuoted => match chr {
                    '"' => {
                        cell.push('"');
                        self.cur_state = State::InQuoted;
                    }
                    _ => {
                        self.cur_state = State::AfterQuoted;
                        self.end_of_char(
                            chr,
                            delimiter,
                            &mut cell,
                            &mut cells,
                            &mut records,
                            &mut line_no,
                            &mut record_start,
                        );
                    }
                },

                State::StartOfField => match chr {
                    '"' => {
                        // Whitespace in front of a quote is not part of the cell.
                        cell.clear();
                        self.cur_state = State::InQuoted;
                    }
                    ' ' | '\t' if chr != delimiter => cell.push(chr),
                    _ => self.end_of_char(
                        chr,
                        delimiter,
                        &mut cell,
                        &mut cells,
                        &mut records,
                        &mut line_no,
                        &mut record_start,
                    ),
                },

                State::InUnquoted | State::AfterQuoted => self.end_of_char(
                    chr,
                    delimiter,
                    &mut cell,
                    &mut cells,
                    &mut records,
                    &mut line_no,
                    &mut record_start,
                ),
            }
        }

        match self.cur_state {
            State::InQuoted => {
                return Err(ParseError::UnterminatedQuote { line: record_start })
            }
            _ => {
                finish_cell(&mut cell, &mut cells, self.cur_state);
                finish_record(&mut cells, &mut records, record_start);
            }
        }
        Ok(records)
    }

    // Handles a character outside of a quoted section.
    #[allow(clippy::too_many_arguments)]
    fn end_of_char(
        &mut self,
        chr: char,
        delimiter: char,
        cell: &mut String,
        cells: &mut Vec<String>,
        records: &mut Vec<(usize, Vec<String>)>,
        line_no: &mut usize,
        record_start: &mut usize,
    ) {
        if chr == delimiter {
            finish_cell(cell, cells, self.cur_state);
            self.cur_state = State::StartOfField;
        } else if chr == '\n' {
            finish_cell(cell, cells, self.cur_state);
            finish_record(cells, records, *record_start);
            *line_no += 1;
            *record_start = *line_no;
            self.cur_state = State::StartOfField;
        } else if self.cur_state == State::AfterQuoted {
            // Text after a closing quote is dropped, but it is worth knowing.
            if !chr.is_whitespace() {
                log::warn!(
                    "ignoring '{}' after quoted cell in line {}",
                    chr,
                    line_no
                );
            }
        } else {
            cell.push(chr);
            self.cur_state = State::InUnquoted;
        }
    }
}

fn finish_cell(cell: &mut String, cells: &mut Vec<String>, state: State) {
    let text = std::mem::take(cell);
    let text = match state {
        State::AfterQuoted | State::QuoteInQuoted => text,
        _ => text.trim().to_owned(),
    };
    cells.push(text);
}

fn finish_record(
    cells: &mut Vec<String>,
    records: &mut Vec<(usize, Vec<String>)>,
    record_start: usize,
) {
    let record = std::mem::take(cells);
    // A single empty cell is a blank line.
    if record.len() == 1 && record[0].is_empty() {
        return;
    }
    log::trace!("line {}: {:?}", record_start, record);
    records.push((record_start, record));
}

// Picks the most frequent candidate outside of quotes in the first
// non-blank line. Falls back to a comma for single-column tables.
fn detect_delimiter(raw_input: &str) -> Option<char> {
    let header = raw_input.lines().find(|line| !line.trim().is_empty())?;
    let mut counts = [(',', 0usize), (';', 0), ('\t', 0)];
    let mut in_quotes = false;
    for chr in header.chars() {
        if chr == '"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some((_, count)) = counts.iter_mut().find(|(candidate, _)| *candidate == chr) {
            *count += 1;
        }
    }
    let (delimiter, count) = counts
        .iter()
        .copied()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })?;
    Some(if count > 0 { delimiter } else { ',' })
}
