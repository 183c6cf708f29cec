//! JSON assembly snapshots
//!
//! A snapshot is a plain copy of everything the exporter reads from the CAD
//! host: occurrence poses, joints and materials. It lets the exporter run
//! outside the host application and doubles as a fixture format in tests.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ExportError;
use crate::frame::Transform;
use crate::host::{AssemblyHost, Joint, JointMotion, MassProperties, Material, RotationLimits};

/// Occurrence entry in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotOccurrence {
    pub name: String,
    /// Row-major world transform (centimeters)
    #[serde(default = "identity_rows")]
    pub transform: [[f64; 4]; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_properties: Option<MassProperties>,
}

fn identity_rows() -> [[f64; 4]; 4] {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Joint entry in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotJoint {
    pub name: String,
    pub parent: String,
    pub child: String,
    /// Host motion kind ("revolute", "rigid", "slider", ...)
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<[f64; 3]>,
    #[serde(default)]
    pub limits: RotationLimits,
}

impl SnapshotJoint {
    fn to_joint(&self) -> Result<Joint, ExportError> {
        let motion = JointMotion::from_kind(&self.kind, self.limits).ok_or_else(|| {
            ExportError::joint(&self.name, format!("unrecognized motion kind '{}'", self.kind))
        })?;

        Ok(Joint {
            name: self.name.clone(),
            parent: self.parent.clone(),
            child: self.child.clone(),
            motion,
            primary_axis: self.axis,
        })
    }
}

/// Material entry in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMaterial {
    pub name: String,
    #[serde(default)]
    pub color: Option<[u8; 4]>,
}

/// A captured assembly implementing [`AssemblyHost`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssemblySnapshot {
    #[serde(default)]
    pub occurrences: Vec<SnapshotOccurrence>,
    #[serde(default)]
    pub joints: Vec<SnapshotJoint>,
    #[serde(default)]
    pub materials: Vec<SnapshotMaterial>,
}

impl AssemblySnapshot {
    /// Parse a snapshot from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a snapshot from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ExportError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn occurrence(&self, name: &str) -> Result<&SnapshotOccurrence, ExportError> {
        self.occurrences
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| ExportError::occurrence(name, "not found in assembly"))
    }
}

impl AssemblyHost for AssemblySnapshot {
    fn occurrences(&self) -> Vec<String> {
        self.occurrences.iter().map(|o| o.name.clone()).collect()
    }

    fn world_transform(&self, occurrence: &str) -> Result<Transform, ExportError> {
        Ok(Transform::from_rows(self.occurrence(occurrence)?.transform))
    }

    fn mass_properties(&self, occurrence: &str) -> Result<Option<MassProperties>, ExportError> {
        Ok(self.occurrence(occurrence)?.mass_properties)
    }

    fn joints(&self, occurrence: &str) -> Result<Vec<Joint>, ExportError> {
        self.occurrence(occurrence)?;
        self.joints
            .iter()
            .filter(|j| j.parent == occurrence || j.child == occurrence)
            .map(SnapshotJoint::to_joint)
            .collect()
    }

    fn materials(&self) -> Result<Vec<Material>, ExportError> {
        Ok(self
            .materials
            .iter()
            .map(|m| Material {
                name: m.name.clone(),
                color: m.color,
            })
            .collect())
    }
}
