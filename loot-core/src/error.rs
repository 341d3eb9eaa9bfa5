use thiserror::Error;

#[derive(Error, Debug)]
pub enum LootError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Export parse error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Database {0} already contains the loot schema")]
    SchemaExists(String),
}

pub type Result<T> = std::result::Result<T, LootError>;
