use std::fmt;

use mongodb::bson::{Bson, Decimal128};
use serde::{Deserialize, Deserializer};

/// Placeholder rendered for absent salary or location values.
pub const NOT_SPECIFIED: &str = "Not specified";

/// One job-opening document as stored in the jobs collection.
/// Read-only: the pipeline never writes listings back.
///
/// Fields are decoded leniently: any BSON value is accepted and rendered as
/// text, so one oddly typed document never fails the whole query.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobListing {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_location")]
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "lenient_salary")]
    pub salary: Option<Salary>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub link: Option<String>,
}

/// A listing may be posted for one place or several.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    One(String),
    Many(Vec<String>),
}

impl Location {
    /// Human-readable form: multiple places joined with ", ", blanks skipped.
    pub fn display_text(&self) -> String {
        match self {
            Location::One(place) => place.trim().to_string(),
            Location::Many(places) => places
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Salary is stored as a number, a Decimal128 amount, or free text ("12-15 LPA").
#[derive(Debug, Clone, PartialEq)]
pub enum Salary {
    Integer(i64),
    Decimal(f64),
    Exact(Decimal128),
    Text(String),
}

impl Salary {
    /// Zero and blank text carry no information and render as not specified.
    pub fn is_specified(&self) -> bool {
        match self {
            Salary::Integer(n) => *n != 0,
            Salary::Decimal(n) => *n != 0.0 && !n.is_nan(),
            Salary::Exact(d) => d
                .to_string()
                .parse::<f64>()
                .map_or(true, |n| n != 0.0),
            Salary::Text(s) => !s.trim().is_empty(),
        }
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Salary::Integer(n) => write!(f, "{n}"),
            // Whole doubles come back from BSON as e.g. 1200000.0; print them as integers.
            Salary::Decimal(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{n:.0}"),
            Salary::Decimal(n) => write!(f, "{n}"),
            Salary::Exact(d) => write!(f, "{d}"),
            Salary::Text(s) => write!(f, "{}", s.trim()),
        }
    }
}

impl JobListing {
    pub fn location_text(&self) -> String {
        self.location
            .as_ref()
            .map(Location::display_text)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    }

    pub fn salary_text(&self) -> String {
        match &self.salary {
            Some(salary) if salary.is_specified() => salary.to_string(),
            _ => NOT_SPECIFIED.to_string(),
        }
    }
}

/// Renders any BSON value as plain text. Null and undefined are absent.
fn bson_text(value: Bson) -> Option<String> {
    match value {
        Bson::Null | Bson::Undefined => None,
        Bson::String(s) => Some(s),
        Bson::Double(n) => Some(Salary::Decimal(n).to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Bson>::deserialize(deserializer)?.and_then(bson_text))
}

fn lenient_location<'de, D>(deserializer: D) -> Result<Option<Location>, D::Error>
where
    D: Deserializer<'de>,
{
    let location = match Option::<Bson>::deserialize(deserializer)? {
        Some(Bson::Array(values)) => Some(Location::Many(
            values.into_iter().filter_map(bson_text).collect(),
        )),
        Some(other) => bson_text(other).map(Location::One),
        None => None,
    };
    Ok(location)
}

fn lenient_salary<'de, D>(deserializer: D) -> Result<Option<Salary>, D::Error>
where
    D: Deserializer<'de>,
{
    let salary = match Option::<Bson>::deserialize(deserializer)? {
        Some(Bson::Int32(n)) => Some(Salary::Integer(n.into())),
        Some(Bson::Int64(n)) => Some(Salary::Integer(n)),
        Some(Bson::Double(n)) => Some(Salary::Decimal(n)),
        Some(Bson::Decimal128(d)) => Some(Salary::Exact(d)),
        Some(other) => bson_text(other).map(Salary::Text),
        None => None,
    };
    Ok(salary)
}
