//! URDF/xacro XML serialization
//!
//! The element structs mirror the subset of URDF this exporter writes. Both the
//! robot description and the materials file are `<robot>` documents, so they
//! share [`Robot`]. Attributes hold already-formatted strings; the numeric
//! rounding happens in [`crate::frame`] before values reach these types.

use quick_xml::de::from_str;
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::frame::{format_number, format_triple};
use crate::model::{JointEdge, LinkNode, RobotTree};

/// Namespace URI bound to the `xacro:` prefix
pub const XACRO_NAMESPACE: &str = "http://www.ros.org/wiki/xacro";

#[derive(Error, Debug)]
pub enum UrdfError {
    #[error("Failed to parse URDF: {0}")]
    ParseError(String),
    #[error("Failed to serialize URDF: {0}")]
    SerializeError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// `<origin xyz=".." rpy=".."/>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(rename = "@xyz")]
    pub xyz: String,
    #[serde(rename = "@rpy")]
    pub rpy: String,
}

impl From<&crate::model::Origin> for Origin {
    fn from(origin: &crate::model::Origin) -> Self {
        Self {
            xyz: origin.xyz.clone(),
            rpy: origin.rpy.clone(),
        }
    }
}

/// `<parent link=".."/>` or `<child link=".."/>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRef {
    #[serde(rename = "@link")]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(rename = "@xyz")]
    pub xyz: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    #[serde(rename = "@lower")]
    pub lower: String,
    #[serde(rename = "@upper")]
    pub upper: String,
    #[serde(rename = "@effort")]
    pub effort: String,
    #[serde(rename = "@velocity")]
    pub velocity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dynamics {
    #[serde(rename = "@friction")]
    pub friction: String,
    #[serde(rename = "@damping")]
    pub damping: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@type")]
    pub joint_type: String,
    pub origin: Origin,
    pub parent: LinkRef,
    pub child: LinkRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamics: Option<Dynamics>,
}

impl From<&JointEdge> for Joint {
    fn from(edge: &JointEdge) -> Self {
        Self {
            name: edge.name.clone(),
            joint_type: edge.joint_type.as_str().to_string(),
            origin: Origin::from(&edge.origin),
            parent: LinkRef {
                link: edge.parent.clone(),
            },
            child: LinkRef {
                link: edge.child.clone(),
            },
            axis: edge.axis.map(|a| Axis {
                xyz: format_triple(a),
            }),
            limit: edge.limits.map(|l| Limit {
                lower: format_number(l.lower),
                upper: format_number(l.upper),
                effort: format_number(l.effort),
                velocity: format_number(l.velocity),
            }),
            dynamics: edge.dynamics.map(|d| Dynamics {
                friction: format_number(d.friction),
                damping: format_number(d.damping),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mass {
    #[serde(rename = "@value")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inertia {
    #[serde(rename = "@ixx")]
    pub ixx: String,
    #[serde(rename = "@iyy")]
    pub iyy: String,
    #[serde(rename = "@izz")]
    pub izz: String,
    #[serde(rename = "@ixy")]
    pub ixy: String,
    #[serde(rename = "@iyz")]
    pub iyz: String,
    #[serde(rename = "@ixz")]
    pub ixz: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inertial {
    pub origin: Origin,
    pub mass: Mass,
    pub inertia: Inertia,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inertial: Option<Inertial>,
}

impl From<&LinkNode> for Link {
    fn from(node: &LinkNode) -> Self {
        Self {
            name: node.name.clone(),
            inertial: node.inertial.as_ref().map(|i| {
                let [ixx, iyy, izz, ixy, iyz, ixz] = i.inertia.map(format_number);
                Inertial {
                    origin: Origin::from(&i.origin),
                    mass: Mass {
                        value: format_number(i.mass),
                    },
                    inertia: Inertia {
                        ixx,
                        iyy,
                        izz,
                        ixy,
                        iyz,
                        ixz,
                    },
                }
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    #[serde(rename = "@rgba")]
    pub rgba: String,
}

/// `<material name=".."><color rgba=".."/></material>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(rename = "@name")]
    pub name: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactCoefficients {
    #[serde(rename = "@mu", default, skip_serializing_if = "Option::is_none")]
    pub mu: Option<String>,
    #[serde(rename = "@kp", default, skip_serializing_if = "Option::is_none")]
    pub kp: Option<String>,
    #[serde(rename = "@kd", default, skip_serializing_if = "Option::is_none")]
    pub kd: Option<String>,
}

/// `<xacro:property name=".."><contact_coefficients .../></xacro:property>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XacroProperty {
    #[serde(rename = "@name")]
    pub name: String,
    pub contact_coefficients: ContactCoefficients,
}

/// `<xacro:include filename=".."/>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XacroInclude {
    #[serde(rename = "@filename")]
    pub filename: String,
}

/// Root `<robot>` element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "robot")]
pub struct Robot {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@xmlns:xacro", default, skip_serializing_if = "Option::is_none")]
    pub xmlns_xacro: Option<String>,
    #[serde(rename = "xacro:include", default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<XacroInclude>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub material: Vec<Material>,
    #[serde(rename = "xacro:property", default, skip_serializing_if = "Vec::is_empty")]
    pub property: Vec<XacroProperty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joint: Vec<Joint>,
}

impl Robot {
    /// Create an empty robot document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            xmlns_xacro: None,
            include: Vec::new(),
            material: Vec::new(),
            property: Vec::new(),
            link: Vec::new(),
            joint: Vec::new(),
        }
    }

    /// Create an empty document that declares the xacro namespace
    pub fn xacro(name: impl Into<String>) -> Self {
        Self {
            xmlns_xacro: Some(XACRO_NAMESPACE.to_string()),
            ..Self::new(name)
        }
    }

    /// Build the robot description from a traversed tree
    pub fn from_tree(name: impl Into<String>, tree: &RobotTree) -> Self {
        Self {
            link: tree.links().iter().map(Link::from).collect(),
            joint: tree.joints().iter().map(Joint::from).collect(),
            ..Self::xacro(name)
        }
    }

    /// Parse a plain URDF document.
    ///
    /// Prefixed elements are read by their local name, so `xacro:include` and
    /// `xacro:property` are skipped and come back empty. Only the links,
    /// joints and materials of a generated document survive a re-parse.
    pub fn from_xml(xml: &str) -> Result<Self, UrdfError> {
        from_str(xml).map_err(|e| UrdfError::ParseError(e.to_string()))
    }

    /// Serialize to an indented XML string with declaration
    pub fn to_xml(&self) -> Result<String, UrdfError> {
        let mut body = String::new();
        let mut serializer = Serializer::new(&mut body);
        serializer.indent(' ', 2);
        self.serialize(serializer)
            .map_err(|e| UrdfError::SerializeError(e.to_string()))?;
        Ok(format!("<?xml version=\"1.0\"?>\n{}\n", body))
    }

    /// Write to file
    pub fn to_file(&self, path: &Path) -> Result<(), UrdfError> {
        let xml = self.to_xml()?;
        std::fs::write(path, xml)?;
        Ok(())
    }

    pub fn find_link(&self, name: &str) -> Option<&Link> {
        self.link.iter().find(|l| l.name == name)
    }

    pub fn find_joint(&self, name: &str) -> Option<&Joint> {
        self.joint.iter().find(|j| j.name == name)
    }
}
