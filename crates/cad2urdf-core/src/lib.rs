//! cad2urdf Core - CAD assembly to URDF conversion
//!
//! This crate turns a CAD assembly into a ROS 2 robot description:
//! - Frame conversion from host transforms to URDF `xyz`/`rpy` strings
//! - Depth-first traversal of the assembly joint graph into a link/joint tree
//! - Material colors and contact coefficients for `materials.xacro`
//! - URDF/xacro serialization and the `<robot>_description` package layout
//!
//! The CAD application is reached through the [`AssemblyHost`] trait.
//! [`AssemblySnapshot`] implements it over a JSON dump of an assembly.

pub mod error;
pub mod export;
pub mod frame;
pub mod host;
pub mod material;
pub mod model;
pub mod package;
pub mod snapshot;
pub mod tables;
pub mod urdf;
pub mod walker;

pub use error::ExportError;
pub use export::{export, render, ExportSettings, ExportSummary, RenderedRobot};
pub use frame::{rpy, xyz, Transform};
pub use host::{AssemblyHost, Joint, JointMotion, MassProperties, Material, RotationLimits};
pub use model::{JointEdge, JointType, LinkNode, RobotTree};
pub use package::PackageLayout;
pub use snapshot::AssemblySnapshot;
pub use tables::{CoefficientRow, CoefficientTable, DynamicsRow, DynamicsTable, TableError, TableValue};
pub use urdf::{Robot, UrdfError};
pub use walker::TreeWalker;
