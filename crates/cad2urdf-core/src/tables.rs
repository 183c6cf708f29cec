//! Per-joint dynamics and per-material contact coefficient tables
//!
//! These tables come from the user (a command dialog or a config file) and are
//! keyed by name. Cells may hold numbers or numeric strings, blank cells count
//! as absent.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::error::ExportError;
use crate::frame::round6;
use crate::model::{sanitize_name, JointDynamics};

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read table: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse table: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A single table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableValue {
    Number(f64),
    Text(String),
}

impl TableValue {
    /// Numeric value of the cell. Blank text is `Ok(None)`, anything that is
    /// not a float is an error carrying the offending text.
    pub fn to_f64(&self) -> Result<Option<f64>, String> {
        match self {
            TableValue::Number(v) => Ok(Some(*v)),
            TableValue::Text(s) if s.trim().is_empty() => Ok(None),
            TableValue::Text(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| format!("'{}' is not a number", s)),
        }
    }
}

impl From<f64> for TableValue {
    fn from(value: f64) -> Self {
        TableValue::Number(value)
    }
}

impl From<&str> for TableValue {
    fn from(value: &str) -> Self {
        TableValue::Text(value.to_string())
    }
}

/// Friction/damping entry for one joint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicsRow {
    /// Joint name (spaces and underscores are interchangeable)
    pub joint: String,
    #[serde(default)]
    pub friction: Option<TableValue>,
    #[serde(default)]
    pub damping: Option<TableValue>,
}

/// Joint friction/damping table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DynamicsTable {
    #[serde(default)]
    pub joint: Vec<DynamicsRow>,
}

impl DynamicsTable {
    pub fn new(rows: Vec<DynamicsRow>) -> Self {
        Self { joint: rows }
    }

    /// Load from a TOML file with `[[joint]]` entries
    pub fn from_file(path: &Path) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, TableError> {
        Ok(toml::from_str(content)?)
    }

    pub fn find(&self, joint_name: &str) -> Option<&DynamicsRow> {
        let key = sanitize_name(joint_name);
        self.joint.iter().find(|row| sanitize_name(&row.joint) == key)
    }

    /// Dynamics for `joint_name`, present only when both friction and damping
    /// are non-zero after rounding. A cell that is not a number is invalid input.
    pub fn lookup(&self, joint_name: &str) -> Result<Option<JointDynamics>, ExportError> {
        let Some(row) = self.find(joint_name) else {
            return Ok(None);
        };

        let cell = |value: &Option<TableValue>| -> Result<f64, ExportError> {
            match value {
                Some(v) => v
                    .to_f64()
                    .map(|n| round6(n.unwrap_or(0.0)))
                    .map_err(|reason| ExportError::joint(joint_name, reason)),
                None => Ok(0.0),
            }
        };

        let friction = cell(&row.friction)?;
        let damping = cell(&row.damping)?;

        if friction != 0.0 && damping != 0.0 {
            Ok(Some(JointDynamics { friction, damping }))
        } else {
            Ok(None)
        }
    }
}

/// Contact coefficients of one material, rounded; zero or blank values are `None`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContactCoefficients {
    pub mu: Option<f64>,
    pub kp: Option<f64>,
    pub kd: Option<f64>,
}

impl ContactCoefficients {
    pub fn is_empty(&self) -> bool {
        self.mu.is_none() && self.kp.is_none() && self.kd.is_none()
    }
}

/// Contact coefficient entry for one material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoefficientRow {
    pub material: String,
    #[serde(default)]
    pub mu: Option<TableValue>,
    #[serde(default)]
    pub kp: Option<TableValue>,
    #[serde(default)]
    pub kd: Option<TableValue>,
}

impl CoefficientRow {
    pub fn coefficients(&self) -> Result<ContactCoefficients, ExportError> {
        let cell = |value: &Option<TableValue>| -> Result<Option<f64>, ExportError> {
            let parsed = match value {
                Some(v) => v
                    .to_f64()
                    .map_err(|reason| ExportError::material(&self.material, reason))?,
                None => None,
            };
            Ok(parsed.map(round6).filter(|n| *n != 0.0))
        };

        Ok(ContactCoefficients {
            mu: cell(&self.mu)?,
            kp: cell(&self.kp)?,
            kd: cell(&self.kd)?,
        })
    }
}

/// Material contact coefficient table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoefficientTable {
    #[serde(default)]
    pub material: Vec<CoefficientRow>,
}

impl CoefficientTable {
    pub fn new(rows: Vec<CoefficientRow>) -> Self {
        Self { material: rows }
    }

    /// Load from a TOML file with `[[material]]` entries
    pub fn from_file(path: &Path) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, TableError> {
        Ok(toml::from_str(content)?)
    }

    pub fn rows(&self) -> &[CoefficientRow] {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamics_both_nonzero() {
        let toml = r#"
[[joint]]
joint = "Rev_1"
friction = 0.1
damping = 0.5

[[joint]]
joint = "Rev_2"
friction = 0.0
damping = 2.0
"#;
        let table = DynamicsTable::from_toml(toml).unwrap();

        let d = table.lookup("Rev 1").unwrap().unwrap();
        assert_eq!(d.friction, 0.1);
        assert_eq!(d.damping, 0.5);

        // friction 0.0 suppresses the whole element
        assert!(table.lookup("Rev 2").unwrap().is_none());
        assert!(table.lookup("Rev 3").unwrap().is_none());
    }

    #[test]
    fn test_dynamics_from_strings() {
        let table = DynamicsTable::new(vec![DynamicsRow {
            joint: "Slide".to_string(),
            friction: Some("0.25".into()),
            damping: Some(" 3 ".into()),
        }]);
        let d = table.lookup("Slide").unwrap().unwrap();
        assert_eq!(d.friction, 0.25);
        assert_eq!(d.damping, 3.0);
    }

    #[test]
    fn test_dynamics_blank_cell_is_zero() {
        let table = DynamicsTable::new(vec![DynamicsRow {
            joint: "Rev1".to_string(),
            friction: Some("".into()),
            damping: Some(1.0.into()),
        }]);
        assert!(table.lookup("Rev1").unwrap().is_none());
    }

    #[test]
    fn test_dynamics_rejects_garbage() {
        let table = DynamicsTable::new(vec![DynamicsRow {
            joint: "Rev1".to_string(),
            friction: Some("abc".into()),
            damping: Some(1.0.into()),
        }]);
        let err = table.lookup("Rev1").unwrap_err();
        assert!(matches!(err, ExportError::InvalidJoint { .. }));
    }

    #[test]
    fn test_coefficients_skip_zero_and_absent() {
        let toml = r#"
[[material]]
material = "Rubber"
mu = 1.2
kp = 0
kd = "15.5"

[[material]]
material = "Steel"
"#;
        let table = CoefficientTable::from_toml(toml).unwrap();
        assert_eq!(table.rows().len(), 2);

        let rubber = table.rows()[0].coefficients().unwrap();
        assert_eq!(rubber.mu, Some(1.2));
        assert_eq!(rubber.kp, None);
        assert_eq!(rubber.kd, Some(15.5));

        let steel = table.rows()[1].coefficients().unwrap();
        assert!(steel.is_empty());
    }

    #[test]
    fn test_dynamics_below_rounding_is_zero() {
        let table = DynamicsTable::new(vec![DynamicsRow {
            joint: "J".to_string(),
            friction: Some(1e-7.into()),
            damping: Some(1.0.into()),
        }]);
        assert!(table.lookup("J").unwrap().is_none());

        let table = DynamicsTable::new(vec![DynamicsRow {
            joint: "J".to_string(),
            friction: Some(0.12345678.into()),
            damping: Some(1.0.into()),
        }]);
        assert_eq!(table.lookup("J").unwrap().unwrap().friction, 0.123457);
    }

    #[test]
    fn test_coefficients_below_rounding_are_absent() {
        let row = CoefficientRow {
            material: "Rubber".to_string(),
            mu: Some(1e-7.into()),
            kp: Some("1e6".into()),
            kd: Some("-4e-7".into()),
        };
        let coefficients = row.coefficients().unwrap();
        assert_eq!(coefficients.mu, None);
        assert_eq!(coefficients.kp, Some(1000000.0));
        assert_eq!(coefficients.kd, None);
    }

    #[test]
    fn test_tables_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("dynamics.toml");
        std::fs::write(&path, "[[joint]]\njoint = \"Rev1\"\nfriction = 0.5\ndamping = 0.25\n").unwrap();
        assert!(DynamicsTable::from_file(&path).unwrap().lookup("Rev1").unwrap().is_some());

        let path = temp.path().join("coefficients.toml");
        std::fs::write(&path, "[[material]]\nmaterial = \"Steel\"\nmu = 0.8\n").unwrap();
        assert_eq!(CoefficientTable::from_file(&path).unwrap().rows().len(), 1);

        let missing = DynamicsTable::from_file(&temp.path().join("absent.toml"));
        assert!(matches!(missing, Err(TableError::IoError(_))));
    }
}
