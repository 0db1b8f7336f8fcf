// ==========================================
// Field validators
// ==========================================
// One validator set per import run, compiled from ImportSettings. Every
// mapped cell goes through apply(); the caller owns row context and turns
// failures into row-level errors.
// ==========================================

use crate::config::ImportSettings;
use crate::importer::error::{ImportError, ImportResult};
use calamine::Data;
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Validation rule attached to a mapped column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// 10 uppercase alphanumeric characters
    PartNo,
    /// Ukrainian title (Cyrillic and Latin)
    TitleUa,
    /// English title (Latin only)
    TitleEn,
    /// "<n>. <text>" label
    SectionLabel,
    /// "<n>.<n>. <text>" label
    SubsectionLabel,
    /// "<n>.<n>.<n>. <text>" label
    GroupLabel,
    /// Whole number
    Integer,
    /// Decimal, quantized to 2 fraction digits
    Price,
    /// Decimal, kept as given
    Decimal,
    /// Presence flag: boolean, or any non-empty text
    TruckFlag,
    /// Fixed unit literal, compared case-insensitively
    Unit(&'static str),
}

/// Validated cell value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Dec(Decimal),
    Flag(bool),
}

impl FieldValue {
    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_int(self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_dec(self) -> Option<Decimal> {
        match self {
            FieldValue::Dec(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_flag(self) -> Option<bool> {
        match self {
            FieldValue::Flag(v) => Some(v),
            _ => None,
        }
    }
}

/// Compiled validator set
#[derive(Debug)]
pub struct FieldValidators {
    part_no: Regex,
    title_ua: Regex,
    title_en: Regex,
    section: Regex,
    subsection: Regex,
    group: Regex,
    decimal: Regex,
}

impl FieldValidators {
    /// Compile the configured patterns
    pub fn new(settings: &ImportSettings) -> ImportResult<Self> {
        Ok(Self {
            part_no: compile(&settings.part_no_pattern)?,
            title_ua: compile(&settings.title_ua_pattern)?,
            title_en: compile(&settings.title_en_pattern)?,
            section: compile(&settings.section_pattern)?,
            subsection: compile(&settings.subsection_pattern)?,
            group: compile(&settings.group_pattern)?,
            decimal: compile(&settings.decimal_pattern)?,
        })
    }

    /// Validate a single cell against a rule
    ///
    /// Returns the violated constraint as a message; the caller adds sheet
    /// and row context.
    pub fn apply(&self, rule: FieldRule, cell: &Data) -> Result<FieldValue, String> {
        match rule {
            FieldRule::PartNo => {
                pattern_value(&self.part_no, cell, "part number").map(FieldValue::Text)
            }
            FieldRule::TitleUa => {
                pattern_value(&self.title_ua, cell, "Ukrainian title").map(FieldValue::Text)
            }
            FieldRule::TitleEn => {
                pattern_value(&self.title_en, cell, "English title").map(FieldValue::Text)
            }
            FieldRule::SectionLabel => {
                pattern_value(&self.section, cell, "section label").map(FieldValue::Text)
            }
            FieldRule::SubsectionLabel => {
                pattern_value(&self.subsection, cell, "subsection label").map(FieldValue::Text)
            }
            FieldRule::GroupLabel => {
                pattern_value(&self.group, cell, "group label").map(FieldValue::Text)
            }
            FieldRule::Integer => integer_value(cell).map(FieldValue::Int),
            FieldRule::Price => self.decimal_value(cell).map(|d| FieldValue::Dec(d.round_dp(2))),
            FieldRule::Decimal => self.decimal_value(cell).map(FieldValue::Dec),
            FieldRule::TruckFlag => truck_value(cell).map(FieldValue::Flag),
            FieldRule::Unit(expected) => unit_value(cell, expected).map(FieldValue::Text),
        }
    }

    /// Decimal from text, float or integer
    ///
    /// Text decimals allow either '.' or ',' as the separator.
    fn decimal_value(&self, cell: &Data) -> Result<Decimal, String> {
        match cell {
            Data::String(s) => {
                let raw = s.trim();
                if !self.decimal.is_match(raw) {
                    return Err(format!("'{raw}' is not a decimal number"));
                }
                Decimal::from_str(&raw.replace(',', "."))
                    .map_err(|e| format!("'{raw}' is not a decimal number: {e}"))
            }
            Data::Float(f) => {
                Decimal::from_f64(*f).ok_or_else(|| format!("{f} is not representable as a decimal"))
            }
            Data::Int(i) => Ok(Decimal::from(*i)),
            Data::Empty => Err("empty cell, expected a decimal number".to_string()),
            other => Err(format!("expected a decimal number, got {other:?}")),
        }
    }
}

fn compile(pattern: &str) -> ImportResult<Regex> {
    Regex::new(pattern).map_err(|e| ImportError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Cell to text, normalizing the numeric variants
///
/// Fraction-free floats become integer strings: purely numeric part numbers
/// arrive from spreadsheets as floats. Empty cells become "" so that
/// non-empty patterns reject them with a real message.
fn text_value(cell: &Data) -> Result<String, String> {
    match cell {
        Data::String(s) => Ok(s.trim().to_string()),
        Data::Int(i) => Ok(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => {
            Ok((*f as i64).to_string())
        }
        Data::Float(f) => Ok(f.to_string()),
        Data::Empty => Ok(String::new()),
        other => Err(format!("expected text, got {other:?}")),
    }
}

fn pattern_value(re: &Regex, cell: &Data, what: &str) -> Result<String, String> {
    let raw = text_value(cell)?;
    if re.is_match(&raw) {
        Ok(raw)
    } else {
        Err(format!("'{raw}' does not match the {what} format"))
    }
}

fn integer_value(cell: &Data) -> Result<i64, String> {
    match cell {
        Data::Int(i) => Ok(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => Ok(*f as i64),
        Data::Float(f) => Err(format!("{f} is not a whole number")),
        Data::String(s) => {
            let raw = s.trim();
            raw.parse::<i64>()
                .map_err(|_| format!("'{raw}' is not a whole number"))
        }
        Data::Empty => Err("empty cell, expected a whole number".to_string()),
        other => Err(format!("expected a whole number, got {other:?}")),
    }
}

/// Truck flag: boolean as-is, non-empty text means set, empty means unset
fn truck_value(cell: &Data) -> Result<bool, String> {
    match cell {
        Data::Bool(b) => Ok(*b),
        Data::String(s) => Ok(!s.trim().is_empty()),
        Data::Empty => Ok(false),
        other => Err(format!("expected a text or boolean flag, got {other:?}")),
    }
}

fn unit_value(cell: &Data, expected: &str) -> Result<String, String> {
    let raw = text_value(cell)?;
    if raw.eq_ignore_ascii_case(expected) {
        Ok(expected.to_string())
    } else {
        Err(format!("'{raw}' is not the expected unit {expected}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validators() -> FieldValidators {
        FieldValidators::new(&ImportSettings::default()).unwrap()
    }

    #[test]
    fn test_part_no_accepts_ten_uppercase_alphanumerics() {
        let v = validators();
        let value = v
            .apply(FieldRule::PartNo, &Data::String("F00HN37002".to_string()))
            .unwrap();
        assert_eq!(value, FieldValue::Text("F00HN37002".to_string()));
    }

    #[test]
    fn test_part_no_rejects_lowercase_and_wrong_length() {
        let v = validators();
        assert!(v
            .apply(FieldRule::PartNo, &Data::String("f00hn37002".to_string()))
            .is_err());
        assert!(v
            .apply(FieldRule::PartNo, &Data::String("F00VC9900".to_string()))
            .is_err());
        assert!(v
            .apply(FieldRule::PartNo, &Data::String("F00VC99002A".to_string()))
            .is_err());
        assert!(v.apply(FieldRule::PartNo, &Data::Empty).is_err());
    }

    #[test]
    fn test_part_no_accepts_numeric_cell() {
        // Purely numeric part numbers come in as floats
        let v = validators();
        let value = v
            .apply(FieldRule::PartNo, &Data::Float(1928403453.0))
            .unwrap();
        assert_eq!(value, FieldValue::Text("1928403453".to_string()));
    }

    #[test]
    fn test_title_pattern_scripts() {
        let v = validators();
        assert!(v
            .apply(
                FieldRule::TitleUa,
                &Data::String("Фільтр паливний (дизель)".to_string())
            )
            .is_ok());
        assert!(v
            .apply(
                FieldRule::TitleEn,
                &Data::String("Fuel filter (diesel)".to_string())
            )
            .is_ok());
        // Cyrillic in the English column fails
        assert!(v
            .apply(FieldRule::TitleEn, &Data::String("Фільтр".to_string()))
            .is_err());
    }

    #[test]
    fn test_hierarchy_labels() {
        let v = validators();
        assert!(v
            .apply(
                FieldRule::SectionLabel,
                &Data::String("1. Automotive Aftermarket".to_string())
            )
            .is_ok());
        assert!(v
            .apply(
                FieldRule::SectionLabel,
                &Data::String("1 Automotive Aftermarket".to_string())
            )
            .is_err());
        assert!(v
            .apply(
                FieldRule::SubsectionLabel,
                &Data::String("1.1. Diesel Injection".to_string())
            )
            .is_ok());
        assert!(v
            .apply(
                FieldRule::SubsectionLabel,
                &Data::String("1.1 Diesel Injection".to_string())
            )
            .is_err());
        assert!(v
            .apply(
                FieldRule::GroupLabel,
                &Data::String("1.1.1. Nozzles".to_string())
            )
            .is_ok());
    }

    #[test]
    fn test_price_quantized_to_two_places() {
        let v = validators();
        let value = v.apply(FieldRule::Price, &Data::Float(101.991)).unwrap();
        assert_eq!(value, FieldValue::Dec(Decimal::from_str("101.99").unwrap()));

        // Tie goes to the even digit
        let value = v
            .apply(FieldRule::Price, &Data::String("2.345".to_string()))
            .unwrap();
        assert_eq!(value, FieldValue::Dec(Decimal::from_str("2.34").unwrap()));
    }

    #[test]
    fn test_decimal_accepts_comma_separator() {
        let v = validators();
        let value = v
            .apply(FieldRule::Decimal, &Data::String("0,125".to_string()))
            .unwrap();
        assert_eq!(value, FieldValue::Dec(Decimal::from_str("0.125").unwrap()));
        assert!(v
            .apply(FieldRule::Decimal, &Data::String("12.3.4".to_string()))
            .is_err());
    }

    #[test]
    fn test_truck_flag_variants() {
        let v = validators();
        assert_eq!(
            v.apply(FieldRule::TruckFlag, &Data::Bool(true)).unwrap(),
            FieldValue::Flag(true)
        );
        assert_eq!(
            v.apply(FieldRule::TruckFlag, &Data::String("X".to_string()))
                .unwrap(),
            FieldValue::Flag(true)
        );
        assert_eq!(
            v.apply(FieldRule::TruckFlag, &Data::Empty).unwrap(),
            FieldValue::Flag(false)
        );
        assert!(v.apply(FieldRule::TruckFlag, &Data::Int(1)).is_err());
    }

    #[test]
    fn test_unit_is_case_insensitive_and_canonical() {
        let v = validators();
        assert_eq!(
            v.apply(FieldRule::Unit("KG"), &Data::String("kg".to_string()))
                .unwrap(),
            FieldValue::Text("KG".to_string())
        );
        assert!(v
            .apply(FieldRule::Unit("KG"), &Data::String("LB".to_string()))
            .is_err());
    }

    #[test]
    fn test_integer_rejects_fractions() {
        let v = validators();
        assert_eq!(
            v.apply(FieldRule::Integer, &Data::Float(25.0)).unwrap(),
            FieldValue::Int(25)
        );
        assert!(v.apply(FieldRule::Integer, &Data::Float(25.5)).is_err());
        assert!(v.apply(FieldRule::Integer, &Data::Empty).is_err());
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let settings = ImportSettings {
            part_no_pattern: "[".to_string(),
            ..ImportSettings::default()
        };
        let err = FieldValidators::new(&settings).unwrap_err();
        assert!(matches!(err, ImportError::InvalidPattern { .. }));
    }
}
