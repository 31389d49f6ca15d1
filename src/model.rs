//! Core data types shared across the pipeline.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// County identifier used as the join key between the topology document and
/// the education dataset.
///
/// Both datasets are free to encode the identifier as a JSON number or a
/// JSON string. The raw token is preserved: a number deserializes to its
/// plain decimal rendering (`1001` → `"1001"`) and a string is kept verbatim
/// (`"01001"` stays `"01001"`). No zero-padding or other canonicalization is
/// applied, so equality matches the raw values in the source documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FipsCode(String);

impl FipsCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FipsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FipsCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for FipsCode {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for FipsCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => FipsCode(n.to_string()),
            Raw::Text(s) => FipsCode(s),
        })
    }
}

/// One row of the education dataset: per-county educational attainment.
#[derive(Debug, Clone, Deserialize)]
pub struct EducationRecord {
    pub fips: FipsCode,
    pub area_name: String,
    pub state: String,
    #[serde(rename = "bachelorsOrHigher")]
    pub bachelors_or_higher: f64,
}

/// A county geometry matched with its education record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedCounty {
    pub id: FipsCode,
    pub area: String,
    pub state: String,
    pub bachelor: f64,
}
