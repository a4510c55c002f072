use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Sales,
    Inventory,
    Revenue,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Sales => "sales",
            ReportKind::Inventory => "inventory",
            ReportKind::Revenue => "revenue",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Sales => "Sales Report",
            ReportKind::Inventory => "Inventory Report",
            ReportKind::Revenue => "Revenue Report",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(ReportKind::Sales),
            "inventory" => Ok(ReportKind::Inventory),
            "revenue" => Ok(ReportKind::Revenue),
            other => Err(AppError::BadRequest(format!("unknown report kind '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub table: ReportTable,
}

impl Report {
    pub fn new(kind: ReportKind, generated_at: DateTime<Utc>, table: ReportTable) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            generated_at,
            table,
        }
    }

    /// `{kind}-report-{YYYY-MM-DD}.{ext}`
    pub fn filename(&self, ext: &str) -> String {
        format!(
            "{}-report-{}.{}",
            self.kind,
            self.generated_at.format("%Y-%m-%d"),
            ext
        )
    }
}
