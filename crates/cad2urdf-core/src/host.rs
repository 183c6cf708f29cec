//! Read-only view of the CAD host's assembly model
//!
//! The exporter never talks to a CAD application directly. An adapter narrows
//! the host's object model into these plain records once, so the traversal
//! and serialization code only ever sees typed values copied out of the host.

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::frame::Transform;

/// Rotation limits reported by a revolute joint motion (radians)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationLimits {
    #[serde(default)]
    pub min_enabled: bool,
    #[serde(default)]
    pub max_enabled: bool,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
}

impl RotationLimits {
    pub fn bounded(min: f64, max: f64) -> Self {
        Self {
            min_enabled: true,
            max_enabled: true,
            min,
            max,
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Both bounds enabled
    pub fn is_bounded(&self) -> bool {
        self.min_enabled && self.max_enabled
    }
}

/// Motion kind of a host joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointMotion {
    Revolute(RotationLimits),
    Rigid,
    /// Prismatic motion, exported as fixed
    Slider,
    Cylindrical,
    PinSlot,
    Planar,
    Ball,
}

impl JointMotion {
    /// Parse the host's motion kind name. Unknown kinds yield `None`.
    pub fn from_kind(kind: &str, limits: RotationLimits) -> Option<Self> {
        let motion = match kind.to_ascii_lowercase().as_str() {
            "revolute" => Self::Revolute(limits),
            "rigid" => Self::Rigid,
            "slider" => Self::Slider,
            "cylindrical" => Self::Cylindrical,
            "pin_slot" | "pinslot" => Self::PinSlot,
            "planar" => Self::Planar,
            "ball" => Self::Ball,
            _ => return None,
        };
        Some(motion)
    }
}

/// A kinematic constraint between two occurrences
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    /// Occurrence on the parent (base) side
    pub parent: String,
    /// Occurrence on the child (driven) side
    pub child: String,
    pub motion: JointMotion,
    /// Primary motion axis, normalized by the host
    pub primary_axis: Option<[f64; 3]>,
}

/// Physical properties of an occurrence in host units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    /// Mass in kilograms
    pub mass: f64,
    /// Center of mass in world coordinates (centimeters)
    pub center_of_mass: [f64; 3],
    /// Inertia about the center of mass in world axes (kg·cm²):
    /// `[ixx, iyy, izz, ixy, iyz, ixz]`
    pub inertia: [f64; 6],
}

/// An appearance material defined in the design
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// RGBA components in `0..=255`, `None` when the host has no color property
    pub color: Option<[u8; 4]>,
}

/// Queries the exporter issues against the CAD host.
///
/// Implementations must return values in host iteration order, which decides
/// the traversal order and therefore which edge wins when an occurrence can be
/// reached through more than one joint.
pub trait AssemblyHost {
    /// Names of every occurrence in the assembly
    fn occurrences(&self) -> Vec<String>;

    /// Pose of `occurrence` relative to the assembly root (centimeters)
    fn world_transform(&self, occurrence: &str) -> Result<Transform, ExportError>;

    /// Physical properties of `occurrence`, if the host can compute them
    fn mass_properties(&self, occurrence: &str) -> Result<Option<MassProperties>, ExportError>;

    /// Joints attached to `occurrence` on either end
    fn joints(&self, occurrence: &str) -> Result<Vec<Joint>, ExportError>;

    /// Appearance materials used by the design
    fn materials(&self) -> Result<Vec<Material>, ExportError>;
}
