// crates/regionmatch-core/src/raw.rs
use crate::common::Level;
use serde::{Deserialize, Serialize};

/// One row of reference data, as produced by an external loader.
///
/// Field aliases accept the column names of the LGD-style `regions.csv`
/// export (`regionID`, `regionName`, `parentID`). `level` may be omitted
/// when the id carries a recognised prefix (`district_572`, `ward_1-12`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRow {
    #[serde(alias = "regionID")]
    pub id: String,
    #[serde(alias = "regionName")]
    pub name: String,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default, alias = "parentID")]
    pub parent_id: Option<String>,
}

impl ReferenceRow {
    /// A row whose level is inferred from the id prefix.
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: None,
            parent_id: parent_id.map(str::to_string),
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Explicit level if given, otherwise the level implied by the id.
    pub fn resolved_level(&self) -> Option<Level> {
        self.level.or_else(|| Level::from_id_prefix(self.id.trim()))
    }

    /// Parent id with blanks treated as "no parent".
    pub fn parent(&self) -> Option<&str> {
        self.parent_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_level_from_prefix_unless_explicit() {
        let row = ReferenceRow::new("subdistrict_5536", "Bengaluru East", Some("district_572"));
        assert_eq!(row.resolved_level(), Some(Level::Subdistrict));
        let row = ReferenceRow::new("KA-01", "Bengaluru Urban", None).with_level(Level::District);
        assert_eq!(row.resolved_level(), Some(Level::District));
        assert_eq!(ReferenceRow::new("KA-01", "x", None).resolved_level(), None);
    }

    #[test]
    fn blank_parent_is_root() {
        let mut row = ReferenceRow::new("state_29", "Karnataka", Some("  "));
        assert_eq!(row.parent(), None);
        row.parent_id = None;
        assert_eq!(row.parent(), None);
    }

    #[cfg(feature = "json")]
    #[test]
    fn accepts_region_csv_column_names() {
        let row: ReferenceRow = serde_json::from_str(
            r#"{"regionID": "district_572", "regionName": "Bengaluru Urban", "parentID": "state_29"}"#,
        )
        .unwrap();
        assert_eq!(row.parent(), Some("state_29"));
        assert_eq!(row.resolved_level(), Some(Level::District));

        let row: ReferenceRow =
            serde_json::from_str(r#"{"id": "x", "name": "Anekal", "level": "taluk"}"#).unwrap();
        assert_eq!(row.level, Some(Level::Subdistrict));
    }
}
