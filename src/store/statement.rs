//! Typed outbound read statements and the physical identifiers they name.

use std::fmt;

/// A fully-qualified table: `DATABASE.SCHEMA.TABLE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub database: String,
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.table)
    }
}

/// A fully-qualified named stage, rendered as `@"DATABASE"."SCHEMA"."NAME"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StageRef {
    pub database: String,
    pub schema: String,
    pub name: String,
}

impl StageRef {
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for StageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@{}.{}.{}",
            quote_ident(&self.database),
            quote_ident(&self.schema),
            quote_ident(&self.name)
        )
    }
}

/// A read statement against the external store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `SELECT *` from one table.
    Select { table: TableRef },
    /// List the files of a stage, optionally only those whose path contains `pattern`.
    List {
        stage: StageRef,
        pattern: Option<String>,
    },
    /// Generate a presigned URL for one staged file.
    PresignedUrl {
        stage: StageRef,
        path: String,
        expiry_secs: Option<u64>,
    },
}

impl Statement {
    pub fn select(table: TableRef) -> Self {
        Statement::Select { table }
    }

    pub fn list(stage: StageRef) -> Self {
        Statement::List {
            stage,
            pattern: None,
        }
    }

    pub fn list_matching(stage: StageRef, path: impl Into<String>) -> Self {
        Statement::List {
            stage,
            pattern: Some(path.into()),
        }
    }

    pub fn presigned_url(
        stage: StageRef,
        path: impl Into<String>,
        expiry_secs: Option<u64>,
    ) -> Self {
        Statement::PresignedUrl {
            stage,
            path: path.into(),
            expiry_secs,
        }
    }

    /// Short label used in metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Select { .. } => "select",
            Statement::List { .. } => "list",
            Statement::PresignedUrl { .. } => "presigned_url",
        }
    }

    /// Render the SQL text.
    pub fn sql(&self) -> String {
        match self {
            Statement::Select { table } => format!("SELECT * FROM {table}"),
            Statement::List {
                stage,
                pattern: None,
            } => format!("LIST {stage}"),
            Statement::List {
                stage,
                pattern: Some(path),
            } => {
                let pattern = format!(".*{}.*", regex::escape(path));
                format!("LIST {stage} PATTERN = {}", quote_literal(&pattern))
            }
            Statement::PresignedUrl {
                stage,
                path,
                expiry_secs,
            } => {
                let expiry = expiry_secs.map(|s| format!(", {s}")).unwrap_or_default();
                format!(
                    "SELECT GET_PRESIGNED_URL({stage}, {}{expiry}) AS IMAGE_URL",
                    quote_literal(path)
                )
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql())
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}
