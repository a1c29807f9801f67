//! Textual relation definitions.
//!
//! A definition block names a relation, lists its columns and gives one row
//! per line:
//!
//! ```text
//! Employees (EID, Name, Age: Integer) = {
//!   E1, John, 32
//!   E2, 'Mary Ann', 28
//! }
//! ```
//!
//! A column may carry an explicit `: Type`. Otherwise its type is inferred
//! from the column's cells: Integer if every cell parses as one, then Float,
//! then Boolean, falling back to Text. A quoted cell is always Text. Lines
//! starting with `#` are comments.

use super::{Catalog, CatalogBuilder};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use raqp_core::schema::{Column, Schema};
use raqp_core::{DataType, Relation, Row, Value};

/// An error in a definition block, with its 1-based line number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefinitionError {
    pub line: usize,
    pub message: String,
}

impl DefinitionError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Definition error on line {}: {}", self.line, self.message)
    }
}

/// A raw cell: its text and whether it was quoted.
struct Cell {
    text: String,
    quoted: bool,
}

struct ColumnSpec {
    name: String,
    declared: Option<DataType>,
}

struct Block {
    name: String,
    header_line: usize,
    columns: Vec<ColumnSpec>,
    rows: Vec<(usize, Vec<Cell>)>,
}

/// Parses every definition block in `text`, in order of appearance.
pub fn parse_definitions(text: &str) -> Result<Vec<(String, Relation)>, DefinitionError> {
    Ok(parse_blocks(text)?
        .into_iter()
        .map(|(_, name, relation)| (name, relation))
        .collect())
}

/// Parses definitions and registers them in a new catalog.
pub fn load_catalog(text: &str) -> Result<Catalog, DefinitionError> {
    let mut builder = CatalogBuilder::default();
    for (line, name, relation) in parse_blocks(text)? {
        builder = builder
            .add_relation(name, relation)
            .map_err(|e| DefinitionError::new(line, format!("{}", e)))?;
    }
    Ok(builder.build())
}

fn parse_blocks(text: &str) -> Result<Vec<(usize, String, Relation)>, DefinitionError> {
    let mut relations = Vec::new();
    let mut current: Option<Block> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (mut block, body) = match current.take() {
            Some(block) => (block, line),
            None => parse_header(line, line_no)?,
        };
        let (body, closed) = split_closing(body);
        if !body.is_empty() {
            block.rows.push((line_no, split_cells(body, line_no)?));
        }
        if closed {
            relations.push(finish_block(block)?);
        } else {
            current = Some(block);
        }
    }

    if let Some(block) = current {
        return Err(DefinitionError::new(
            block.header_line,
            format!("relation {} is missing its closing '}}'", block.name),
        ));
    }
    Ok(relations)
}

/// Parses `Name (c1, c2: Type) = {` and returns the text after the brace.
fn parse_header(line: &str, line_no: usize) -> Result<(Block, &str), DefinitionError> {
    let open = line
        .find('(')
        .ok_or_else(|| DefinitionError::new(line_no, "expected `Name (columns) = {`"))?;
    let name = line[..open].trim();
    if !super::is_identifier(name) {
        return Err(DefinitionError::new(
            line_no,
            format!("invalid relation name {:?}", name),
        ));
    }

    let close = line[open..]
        .find(')')
        .map(|i| open + i)
        .ok_or_else(|| DefinitionError::new(line_no, "unclosed column list"))?;
    let columns = parse_columns(&line[open + 1..close], line_no)?;

    let rest = line[close + 1..].trim_start();
    let rest = rest
        .strip_prefix('=')
        .ok_or_else(|| DefinitionError::new(line_no, "expected '=' after the column list"))?
        .trim_start();
    let rest = rest
        .strip_prefix('{')
        .ok_or_else(|| DefinitionError::new(line_no, "expected '{' to open the rows"))?;

    Ok((
        Block {
            name: name.into(),
            header_line: line_no,
            columns,
            rows: Vec::new(),
        },
        rest.trim(),
    ))
}

fn parse_columns(list: &str, line_no: usize) -> Result<Vec<ColumnSpec>, DefinitionError> {
    let mut columns: Vec<ColumnSpec> = Vec::new();
    for part in list.split(',') {
        let part = part.trim();
        let (name, declared) = match part.split_once(':') {
            Some((name, ty)) => {
                let ty = ty.trim();
                let declared = DataType::from_name(ty).ok_or_else(|| {
                    DefinitionError::new(line_no, format!("unknown column type {:?}", ty))
                })?;
                (name.trim(), Some(declared))
            }
            None => (part, None),
        };
        if !super::is_identifier(name) {
            return Err(DefinitionError::new(
                line_no,
                format!("invalid column name {:?}", name),
            ));
        }
        if columns.iter().any(|c| c.name == name) {
            return Err(DefinitionError::new(
                line_no,
                format!("duplicate column {}", name),
            ));
        }
        columns.push(ColumnSpec {
            name: name.into(),
            declared,
        });
    }
    Ok(columns)
}

/// Splits a trailing `}` off a line. Returns the remaining body and whether
/// the block closed.
fn split_closing(line: &str) -> (&str, bool) {
    match line.strip_suffix('}') {
        Some(body) if !ends_inside_quote(body) => (body.trim(), true),
        _ => (line.trim(), false),
    }
}

fn ends_inside_quote(text: &str) -> bool {
    let mut quote = None;
    for c in text.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None => {}
        }
    }
    quote.is_some()
}

/// Splits a row on commas. Quotes group text containing commas.
fn split_cells(line: &str, line_no: usize) -> Result<Vec<Cell>, DefinitionError> {
    let mut cells = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let cell = match chars.peek() {
            Some(&q) if q == '\'' || q == '"' => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some(c) if c == q => break,
                        Some(c) => text.push(c),
                        None => {
                            return Err(DefinitionError::new(line_no, "unterminated quoted value"))
                        }
                    }
                }
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
                Cell { text, quoted: true }
            }
            _ => {
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if c == ',' {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }
                Cell {
                    text: String::from(text.trim_end()),
                    quoted: false,
                }
            }
        };
        cells.push(cell);

        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(c) => {
                return Err(DefinitionError::new(
                    line_no,
                    format!("unexpected {:?} after a quoted value", c),
                ))
            }
        }
    }
    Ok(cells)
}

fn finish_block(block: Block) -> Result<(usize, String, Relation), DefinitionError> {
    let width = block.columns.len();
    for (line_no, cells) in &block.rows {
        if cells.len() != width {
            return Err(DefinitionError::new(
                *line_no,
                format!(
                    "row of {} has {} values, expected {}",
                    block.name,
                    cells.len(),
                    width
                ),
            ));
        }
    }

    let mut types = Vec::with_capacity(width);
    for (i, spec) in block.columns.iter().enumerate() {
        let ty = spec
            .declared
            .unwrap_or_else(|| infer_type(block.rows.iter().map(|(_, cells)| &cells[i])));
        types.push(ty);
    }

    let mut rows = Vec::with_capacity(block.rows.len());
    for (line_no, cells) in &block.rows {
        let mut values = Vec::with_capacity(width);
        for ((cell, ty), spec) in cells.iter().zip(&types).zip(&block.columns) {
            let value = convert(cell, *ty).ok_or_else(|| {
                DefinitionError::new(
                    *line_no,
                    format!("value {:?} is not a valid {} for column {}", cell.text, ty, spec.name),
                )
            })?;
            values.push(value);
        }
        rows.push(Row::new(values));
    }

    let columns = block
        .columns
        .iter()
        .zip(&types)
        .map(|(spec, ty)| Column::new(spec.name.clone(), *ty))
        .collect();
    let schema = Schema::try_new(columns)
        .map_err(|e| DefinitionError::new(block.header_line, format!("{}", e)))?;
    let relation = Relation::try_new(schema, rows)
        .map_err(|e| DefinitionError::new(block.header_line, format!("{}", e)))?;
    Ok((block.header_line, block.name, relation))
}

fn infer_type<'a>(cells: impl Iterator<Item = &'a Cell> + Clone) -> DataType {
    let candidates = [DataType::Integer, DataType::Float, DataType::Boolean];
    let mut any = false;
    for ty in candidates {
        let mut all = true;
        for cell in cells.clone() {
            any = true;
            if cell.quoted || convert(cell, ty).is_none() {
                all = false;
                break;
            }
        }
        if !any {
            return DataType::Text;
        }
        if all {
            return ty;
        }
    }
    DataType::Text
}

fn convert(cell: &Cell, ty: DataType) -> Option<Value> {
    let text = cell.text.as_str();
    match ty {
        DataType::Text => Some(Value::Text(cell.text.clone())),
        _ if cell.quoted => None,
        DataType::Integer => text.parse::<i64>().ok().map(Value::Integer),
        DataType::Float => text
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float),
        DataType::Boolean => {
            if text.eq_ignore_ascii_case("true") {
                Some(Value::Boolean(true))
            } else if text.eq_ignore_ascii_case("false") {
                Some(Value::Boolean(false))
            } else {
                None
            }
        }
    }
}
