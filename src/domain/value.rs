use std::fmt;

use super::entity::FieldType;

/// A single stored cell, as ingested or as read back from storage
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl CellValue {
    /// Coerce a raw CSV cell to the declared field type.
    ///
    /// Blank cells become NULL. Values that do not parse as the declared
    /// numeric type are kept as text, the same way SQLite column affinity
    /// would store them.
    pub fn coerce(raw: &str, kind: FieldType) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }

        match kind {
            FieldType::Integer => trimmed
                .parse::<i64>()
                .map(CellValue::Integer)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
            FieldType::Real => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(CellValue::Real)
                .unwrap_or_else(|| CellValue::Text(raw.to_string())),
            FieldType::Text => CellValue::Text(raw.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Real(v) => write!(f, "{}", v),
            CellValue::Text(v) => f.write_str(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_null() {
        assert_eq!(CellValue::coerce("", FieldType::Integer), CellValue::Null);
        assert_eq!(CellValue::coerce("   ", FieldType::Text), CellValue::Null);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(CellValue::coerce(" 42 ", FieldType::Integer), CellValue::Integer(42));
        assert_eq!(CellValue::coerce("-7", FieldType::Integer), CellValue::Integer(-7));
        assert_eq!(CellValue::coerce("12.5", FieldType::Real), CellValue::Real(12.5));
        assert_eq!(CellValue::coerce("3", FieldType::Real), CellValue::Real(3.0));
    }

    #[test]
    fn test_unparseable_number_kept_as_text() {
        assert_eq!(
            CellValue::coerce("n/a", FieldType::Integer),
            CellValue::Text("n/a".to_string())
        );
        assert_eq!(
            CellValue::coerce("1,234.50", FieldType::Real),
            CellValue::Text("1,234.50".to_string())
        );
        assert_eq!(
            CellValue::coerce("NaN", FieldType::Real),
            CellValue::Text("NaN".to_string())
        );
    }

    #[test]
    fn test_text_is_not_trimmed() {
        assert_eq!(
            CellValue::coerce(" Main St ", FieldType::Text),
            CellValue::Text(" Main St ".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Integer(5).to_string(), "5");
        assert_eq!(CellValue::Real(0.25).to_string(), "0.25");
    }
}
