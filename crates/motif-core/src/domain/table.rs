use super::errors::{MotifError, MotifResult};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One result row. Fields keep the order the grammar produced them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Scalar)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Scalar>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered rows sharing one column set.
///
/// The first pushed row fixes the columns. Later rows may leave trailing
/// optional columns out but never add new ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    #[serde(skip)]
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) -> MotifResult<()> {
        if self.rows.is_empty() && self.columns.is_empty() {
            self.columns = record.columns().map(str::to_string).collect();
        } else if let Some(unknown) = record
            .columns()
            .find(|column| !self.columns.iter().any(|known| known == column))
        {
            return Err(MotifError::output_parse(
                "PARSE.COLUMN_MISMATCH",
                format!(
                    "row {} introduces column '{}' outside the table columns [{}]",
                    self.rows.len() + 1,
                    unknown,
                    self.columns.join(", ")
                ),
                "",
            ));
        }
        self.rows.push(record);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Vec<Option<&Scalar>> {
        self.rows.iter().map(|row| row.get(name)).collect()
    }

    /// Tab separated text with a header line. Missing optional cells are left empty.
    pub fn render_text(&self) -> String {
        let mut rendered = self.columns.join("\t");
        rendered.push('\n');
        for row in &self.rows {
            let cells = self
                .columns
                .iter()
                .map(|column| row.get(column).map(Scalar::to_string).unwrap_or_default())
                .collect::<Vec<_>>();
            rendered.push_str(&cells.join("\t"));
            rendered.push('\n');
        }
        rendered
    }
}
