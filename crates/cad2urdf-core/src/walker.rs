//! Depth-first traversal of the assembly joint graph
//!
//! Starting at the base occurrence, every joint whose parent end is the
//! occurrence being visited leads to a child occurrence. Each newly reached
//! child becomes a link and the joint becomes the edge into it, with its
//! origin expressed relative to the parent occurrence.
//!
//! When an occurrence can be reached through more than one joint, the first
//! joint discovered wins and the others are dropped. Discovery order is the
//! host's joint iteration order, so for assemblies whose joint graph is not a
//! strict tree the result depends on that order.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::ExportError;
use crate::frame::{round6, Transform, CENTIMETERS_PER_METER};
use crate::host::{AssemblyHost, Joint, JointMotion};
use crate::model::{
    joint_name, link_name, Inertial, JointEdge, JointLimits, JointType, LinkNode, Origin,
    RobotTree, BASE_FOOTPRINT, BASE_FOOTPRINT_JOINT, BASE_LINK,
};
use crate::tables::DynamicsTable;

/// URDF joint type for a host joint motion
pub fn joint_type_for(motion: &JointMotion) -> JointType {
    match motion {
        JointMotion::Revolute(limits) if limits.is_bounded() => JointType::Revolute,
        JointMotion::Revolute(_) => JointType::Continuous,
        _ => JointType::Fixed,
    }
}

/// Walks a host assembly and builds the [`RobotTree`]
pub struct TreeWalker<'a, H: AssemblyHost + ?Sized> {
    host: &'a H,
    dynamics: &'a DynamicsTable,
}

impl<'a, H: AssemblyHost + ?Sized> TreeWalker<'a, H> {
    pub fn new(host: &'a H, dynamics: &'a DynamicsTable) -> Self {
        Self { host, dynamics }
    }

    /// Traverse from `root_occurrence`, which becomes `base_link`.
    ///
    /// With a `base_footprint` pose (world frame, centimeters) the tree is
    /// rooted at a massless `base_footprint` link joined to `base_link` by a
    /// fixed joint.
    pub fn traverse(
        &self,
        root_occurrence: &str,
        base_footprint: Option<&Transform>,
    ) -> Result<RobotTree, ExportError> {
        let root_world = self.host.world_transform(root_occurrence)?;
        let base = LinkNode {
            name: BASE_LINK.to_string(),
            occurrence: Some(root_occurrence.to_string()),
            inertial: self.inertial(root_occurrence, &root_world)?,
        };

        let mut tree = match base_footprint {
            Some(footprint) => {
                let relative = root_world.relative_to(footprint).ok_or_else(|| {
                    ExportError::occurrence(BASE_FOOTPRINT, "footprint transform is not invertible")
                })?;

                let mut tree = RobotTree::new(LinkNode::base_footprint());
                tree.add_link(base);
                tree.add_joint(JointEdge {
                    name: BASE_FOOTPRINT_JOINT.to_string(),
                    joint_type: JointType::Fixed,
                    parent: BASE_FOOTPRINT.to_string(),
                    child: BASE_LINK.to_string(),
                    origin: Origin::from_transform(&relative, CENTIMETERS_PER_METER),
                    axis: None,
                    limits: None,
                    dynamics: None,
                });
                tree
            }
            None => RobotTree::new(base),
        };

        let mut visited = HashSet::new();
        visited.insert(root_occurrence.to_string());

        self.visit(root_occurrence, BASE_LINK, &root_world, &mut tree, &mut visited)?;
        self.report_unreached(&visited);

        info!(
            root = %root_occurrence,
            links = tree.links().len(),
            joints = tree.joints().len(),
            "Assembly traversal complete"
        );
        Ok(tree)
    }

    fn visit(
        &self,
        occurrence: &str,
        link: &str,
        world: &Transform,
        tree: &mut RobotTree,
        visited: &mut HashSet<String>,
    ) -> Result<(), ExportError> {
        for joint in self.host.joints(occurrence)? {
            if joint.parent != occurrence {
                continue;
            }
            if visited.contains(&joint.child) {
                debug!(
                    joint = %joint.name,
                    child = %joint.child,
                    "Child already has a parent joint, dropping edge"
                );
                continue;
            }

            let child_link = link_name(&joint.child);
            if tree.contains_link(&child_link) {
                return Err(ExportError::occurrence(
                    &joint.child,
                    format!("link name '{}' is already in use", child_link),
                ));
            }

            let child_world = self.host.world_transform(&joint.child)?;
            let edge = self.build_joint(&joint, link, &child_link, world, &child_world)?;
            debug!(
                joint = %edge.name,
                joint_type = %edge.joint_type,
                parent = %link,
                child = %child_link,
                "Adding joint"
            );

            visited.insert(joint.child.clone());
            tree.add_link(LinkNode {
                name: child_link.clone(),
                occurrence: Some(joint.child.clone()),
                inertial: self.inertial(&joint.child, &child_world)?,
            });
            tree.add_joint(edge);

            self.visit(&joint.child, &child_link, &child_world, tree, visited)?;
        }

        Ok(())
    }

    /// Build the edge for `joint` between two already named links
    pub fn build_joint(
        &self,
        joint: &Joint,
        parent_link: &str,
        child_link: &str,
        parent_world: &Transform,
        child_world: &Transform,
    ) -> Result<JointEdge, ExportError> {
        let joint_type = joint_type_for(&joint.motion);

        let relative = child_world.relative_to(parent_world).ok_or_else(|| {
            ExportError::occurrence(&joint.parent, "world transform is not invertible")
        })?;

        let axis = match joint_type {
            JointType::Fixed => None,
            _ => {
                let axis = joint
                    .primary_axis
                    .ok_or_else(|| ExportError::joint(&joint.name, "missing primary motion axis"))?;
                Some(axis.map(round6))
            }
        };

        let limits = match (joint_type, joint.motion) {
            (JointType::Revolute, JointMotion::Revolute(range)) => {
                Some(JointLimits::rotation(range.min, range.max))
            }
            _ => None,
        };

        Ok(JointEdge {
            name: joint_name(&joint.name),
            joint_type,
            parent: parent_link.to_string(),
            child: child_link.to_string(),
            origin: Origin::from_transform(&relative, CENTIMETERS_PER_METER),
            axis,
            limits,
            dynamics: self.dynamics.lookup(&joint.name)?,
        })
    }

    fn inertial(&self, occurrence: &str, world: &Transform) -> Result<Option<Inertial>, ExportError> {
        Ok(self
            .host
            .mass_properties(occurrence)?
            .map(|props| Inertial::from_mass_properties(&props, world)))
    }

    fn report_unreached(&self, visited: &HashSet<String>) {
        for occurrence in self.host.occurrences() {
            if !visited.contains(&occurrence) {
                warn!(
                    occurrence = %occurrence,
                    "Occurrence is not reachable from the base link and was omitted"
                );
            }
        }
    }
}
