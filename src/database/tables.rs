use super::manager::DatabaseError;

/// Postgres truncates identifiers longer than this
const MAX_IDENTIFIER_LEN: usize = 63;

/// Resolved, quoted table names for the booking schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    entry: String,
    repeat: String,
}

impl TableNames {
    pub fn with_prefix(prefix: &str) -> Result<Self, DatabaseError> {
        if !Self::is_valid_prefix(prefix) {
            return Err(DatabaseError::InvalidTablePrefix(prefix.to_string()));
        }

        Ok(Self {
            entry: Self::quote_identifier(&format!("{}entry", prefix)),
            repeat: Self::quote_identifier(&format!("{}repeat", prefix)),
        })
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn repeat(&self) -> &str {
        &self.repeat
    }

    /// Accepts an empty prefix or [a-zA-Z0-9_]+ short enough for the longest table name
    fn is_valid_prefix(prefix: &str) -> bool {
        prefix.len() + "repeat".len() <= MAX_IDENTIFIER_LEN
            && prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}
