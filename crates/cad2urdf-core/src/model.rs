//! Robot tree produced by the assembly traversal
//!
//! A [`RobotTree`] holds one [`LinkNode`] per rigid body and one [`JointEdge`]
//! per parent/child relationship. Every link except the root is the child of
//! exactly one joint.

use nalgebra::{Matrix3, Vector3};
use std::fmt;

use crate::frame::{self, Transform, CENTIMETERS_PER_METER};
use crate::host::MassProperties;

/// Name of the link created for the designated base occurrence
pub const BASE_LINK: &str = "base_link";
/// Name of the optional massless reference frame below the base link
pub const BASE_FOOTPRINT: &str = "base_footprint";
/// Name of the fixed joint between `base_footprint` and `base_link`
pub const BASE_FOOTPRINT_JOINT: &str = "base_footprint_joint";

/// Effort limit written for every revolute joint
pub const EFFORT_LIMIT: f64 = 1000.0;
/// Velocity limit written for every revolute joint
pub const VELOCITY_LIMIT: f64 = 100.0;

/// kg·cm² per kg·m²
const INERTIA_SCALE: f64 = CENTIMETERS_PER_METER * CENTIMETERS_PER_METER;

/// Replace spaces with underscores
pub fn sanitize_name(name: &str) -> String {
    name.replace(' ', "_")
}

/// Link name for a host occurrence
pub fn link_name(occurrence: &str) -> String {
    format!("{}_link", sanitize_name(occurrence))
}

/// URDF joint name for a host joint
pub fn joint_name(joint: &str) -> String {
    format!("{}_joint", sanitize_name(joint))
}

/// Origin of a joint or inertial frame, already formatted for URDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Translation in meters, `"x y z"`
    pub xyz: String,
    /// Rotation in radians, `"roll pitch yaw"`
    pub rpy: String,
}

impl Origin {
    pub fn from_transform(transform: &Transform, unit_divisor: f64) -> Self {
        Self {
            xyz: frame::xyz(transform, unit_divisor),
            rpy: frame::rpy(transform),
        }
    }
}

/// Mass properties of a link in SI units, expressed in the link frame
#[derive(Debug, Clone, PartialEq)]
pub struct Inertial {
    /// Center of mass
    pub origin: Origin,
    /// Mass in kilograms
    pub mass: f64,
    /// Inertia about the center of mass in kg·m²: `[ixx, iyy, izz, ixy, iyz, ixz]`
    pub inertia: [f64; 6],
}

impl Inertial {
    /// Convert host mass properties (world frame, centimeters) into the frame
    /// of the link whose world pose is `link_world`.
    pub fn from_mass_properties(props: &MassProperties, link_world: &Transform) -> Self {
        let rotation = link_world.rotation();
        let rotation_t = rotation.transpose();

        let [cx, cy, cz] = props.center_of_mass;
        let com = rotation_t * (Vector3::new(cx, cy, cz) - link_world.translation());
        let com_tf = Transform::from_translation(com.x, com.y, com.z);

        let [ixx, iyy, izz, ixy, iyz, ixz] = props.inertia;
        let world_tensor = Matrix3::new(
            ixx, ixy, ixz, //
            ixy, iyy, iyz, //
            ixz, iyz, izz,
        );
        let local = rotation_t * world_tensor * rotation / INERTIA_SCALE;

        Self {
            origin: Origin::from_transform(&com_tf, CENTIMETERS_PER_METER),
            mass: props.mass,
            inertia: [
                local[(0, 0)],
                local[(1, 1)],
                local[(2, 2)],
                local[(0, 1)],
                local[(1, 2)],
                local[(0, 2)],
            ],
        }
    }
}

/// One rigid body in the output tree
#[derive(Debug, Clone, PartialEq)]
pub struct LinkNode {
    pub name: String,
    /// Host occurrence this link was created from (`None` for base_footprint)
    pub occurrence: Option<String>,
    pub inertial: Option<Inertial>,
}

impl LinkNode {
    /// Massless reference frame below the base link
    pub fn base_footprint() -> Self {
        Self {
            name: BASE_FOOTPRINT.to_string(),
            occurrence: None,
            inertial: None,
        }
    }
}

/// URDF joint type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointType {
    Fixed,
    Revolute,
    Continuous,
}

impl JointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JointType::Fixed => "fixed",
            JointType::Revolute => "revolute",
            JointType::Continuous => "continuous",
        }
    }
}

impl fmt::Display for JointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointLimits {
    pub lower: f64,
    pub upper: f64,
    pub effort: f64,
    pub velocity: f64,
}

impl JointLimits {
    /// Rotation range with the fixed effort/velocity constants
    pub fn rotation(lower: f64, upper: f64) -> Self {
        Self {
            lower: frame::round6(lower),
            upper: frame::round6(upper),
            effort: EFFORT_LIMIT,
            velocity: VELOCITY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointDynamics {
    pub friction: f64,
    pub damping: f64,
}

/// One parent→child edge in the output tree
#[derive(Debug, Clone, PartialEq)]
pub struct JointEdge {
    pub name: String,
    pub joint_type: JointType,
    pub parent: String,
    pub child: String,
    /// Child frame relative to the parent link frame
    pub origin: Origin,
    pub axis: Option<[f64; 3]>,
    pub limits: Option<JointLimits>,
    pub dynamics: Option<JointDynamics>,
}

/// Links and joints of a traversed assembly
#[derive(Debug, Clone)]
pub struct RobotTree {
    root: String,
    links: Vec<LinkNode>,
    joints: Vec<JointEdge>,
}

impl RobotTree {
    /// Create a tree containing only `root`
    pub fn new(root: LinkNode) -> Self {
        Self {
            root: root.name.clone(),
            links: vec![root],
            joints: Vec::new(),
        }
    }

    pub(crate) fn add_link(&mut self, link: LinkNode) {
        self.links.push(link);
    }

    pub(crate) fn add_joint(&mut self, joint: JointEdge) {
        self.joints.push(joint);
    }

    /// Name of the link with no incoming joint
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Links in discovery order
    pub fn links(&self) -> &[LinkNode] {
        &self.links
    }

    /// Joints in discovery order
    pub fn joints(&self) -> &[JointEdge] {
        &self.joints
    }

    pub fn link(&self, name: &str) -> Option<&LinkNode> {
        self.links.iter().find(|l| l.name == name)
    }

    pub fn contains_link(&self, name: &str) -> bool {
        self.link(name).is_some()
    }

    pub fn joint(&self, name: &str) -> Option<&JointEdge> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// The joint whose child is `link`, if any
    pub fn parent_joint(&self, link: &str) -> Option<&JointEdge> {
        self.joints.iter().find(|j| j.child == link)
    }
}
