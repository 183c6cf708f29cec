//! Export pipeline: traverse, build documents, write the package

use std::path::PathBuf;
use tracing::info;

use crate::error::ExportError;
use crate::frame::Transform;
use crate::host::AssemblyHost;
use crate::material::build_materials;
use crate::model::RobotTree;
use crate::package::PackageLayout;
use crate::tables::{CoefficientTable, DynamicsTable};
use crate::urdf::{Robot, XacroInclude};
use crate::walker::TreeWalker;

/// Everything one export needs besides the host
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Robot name, used for the `<robot>` element and the package name
    pub robot_name: String,
    /// Directory the `<robot>_description` package is created in
    pub export_path: PathBuf,
    /// Host occurrence that becomes `base_link`
    pub base_link: String,
    /// World pose of the optional `base_footprint` frame, centimeters
    pub base_footprint: Option<Transform>,
    pub dynamics: DynamicsTable,
    pub coefficients: CoefficientTable,
}

impl ExportSettings {
    pub fn new(
        robot_name: impl Into<String>,
        export_path: impl Into<PathBuf>,
        base_link: impl Into<String>,
    ) -> Self {
        Self {
            robot_name: robot_name.into(),
            export_path: export_path.into(),
            base_link: base_link.into(),
            base_footprint: None,
            dynamics: DynamicsTable::default(),
            coefficients: CoefficientTable::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if self.robot_name.is_empty() {
            return Err(ExportError::InvalidSettings("robot name is empty".to_string()));
        }
        if self.robot_name.chars().any(char::is_whitespace) {
            return Err(ExportError::InvalidSettings(format!(
                "robot name '{}' contains whitespace",
                self.robot_name
            )));
        }
        if self.base_link.is_empty() {
            return Err(ExportError::InvalidSettings(
                "no base occurrence selected".to_string(),
            ));
        }
        Ok(())
    }

    pub fn layout(&self) -> PackageLayout {
        PackageLayout::new(&self.export_path, &self.robot_name)
    }
}

/// Documents produced by [`render`], not yet written anywhere
#[derive(Debug, Clone)]
pub struct RenderedRobot {
    pub tree: RobotTree,
    pub robot: Robot,
    pub materials: Robot,
    pub robot_xml: String,
    pub materials_xml: String,
}

/// Outcome of a successful [`export`]
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub package_path: PathBuf,
    pub robot_path: PathBuf,
    pub materials_path: PathBuf,
    pub links: usize,
    pub joints: usize,
    pub materials: usize,
}

/// Build both documents in memory
pub fn render<H: AssemblyHost + ?Sized>(
    host: &H,
    settings: &ExportSettings,
) -> Result<RenderedRobot, ExportError> {
    settings.validate()?;

    let tree = TreeWalker::new(host, &settings.dynamics)
        .traverse(&settings.base_link, settings.base_footprint.as_ref())?;

    let mut robot = Robot::from_tree(&settings.robot_name, &tree);
    robot.include.push(XacroInclude {
        filename: settings.layout().materials_include(),
    });

    let materials = build_materials(host, &settings.robot_name, &settings.coefficients)?;

    let robot_xml = robot.to_xml()?;
    let materials_xml = materials.to_xml()?;

    Ok(RenderedRobot {
        tree,
        robot,
        materials,
        robot_xml,
        materials_xml,
    })
}

/// Render and write the description package. Nothing is written unless
/// rendering succeeds.
pub fn export<H: AssemblyHost + ?Sized>(
    host: &H,
    settings: &ExportSettings,
) -> Result<ExportSummary, ExportError> {
    let rendered = render(host, settings)?;

    let layout = settings.layout();
    layout.create()?;
    layout.write_documents(&rendered.robot_xml, &rendered.materials_xml)?;

    let summary = ExportSummary {
        package_path: layout.root().to_path_buf(),
        robot_path: layout.robot_path(),
        materials_path: layout.materials_path(),
        links: rendered.tree.links().len(),
        joints: rendered.tree.joints().len(),
        materials: rendered.materials.material.len(),
    };

    info!(
        robot = %settings.robot_name,
        path = %summary.package_path.display(),
        links = summary.links,
        joints = summary.joints,
        materials = summary.materials,
        "Exported robot description"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::AssemblySnapshot;
    use crate::tables::{CoefficientRow, DynamicsRow};
    use tempfile::TempDir;

    const ARM: &str = r#"{
        "occurrences": [
            { "name": "Base v1:1" },
            {
                "name": "Arm v1:1",
                "transform": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 10], [0, 0, 0, 1]],
                "mass_properties": {
                    "mass": 0.25,
                    "center_of_mass": [0, 0, 15],
                    "inertia": [50, 50, 20, 0, 0, 0]
                }
            }
        ],
        "joints": [
            {
                "name": "Rev 1",
                "parent": "Base v1:1",
                "child": "Arm v1:1",
                "kind": "revolute",
                "axis": [0, 0, 1],
                "limits": { "min_enabled": true, "max_enabled": true, "min": -1.57, "max": 1.57 }
            }
        ],
        "materials": [ { "name": "Steel", "color": [128, 128, 128, 255] } ]
    }"#;

    fn settings(path: &std::path::Path) -> ExportSettings {
        let mut settings = ExportSettings::new("arm", path, "Base v1:1");
        settings.dynamics = DynamicsTable::new(vec![DynamicsRow {
            joint: "Rev 1".to_string(),
            friction: Some(0.1.into()),
            damping: Some(0.5.into()),
        }]);
        settings.coefficients = CoefficientTable::new(vec![CoefficientRow {
            material: "Steel".to_string(),
            mu: Some(0.8.into()),
            kp: None,
            kd: None,
        }]);
        settings
    }

    #[test]
    fn test_render_robot() {
        let snapshot = AssemblySnapshot::from_json(ARM).unwrap();
        let rendered = render(&snapshot, &settings(std::path::Path::new("out"))).unwrap();

        let xml = &rendered.robot_xml;
        assert!(xml.starts_with("<?xml version=\"1.0\"?>"));
        assert!(xml.contains(r#"<robot name="arm" xmlns:xacro="http://www.ros.org/wiki/xacro">"#));
        assert!(xml.contains(r#"filename="$(find arm_description)/urdf/materials.xacro""#));
        assert!(xml.contains(r#"<link name="base_link">"#) || xml.contains(r#"<link name="base_link"/>"#));
        assert!(xml.contains(r#"<joint name="Rev_1_joint" type="revolute">"#));
        assert!(xml.contains(r#"<origin xyz="0.0 0.0 0.1" rpy="0.0 0.0 0.0"/>"#));
        assert!(xml.contains(r#"<limit lower="-1.57" upper="1.57" effort="1000.0" velocity="100.0"/>"#));
        assert!(xml.contains(r#"<dynamics friction="0.1" damping="0.5"/>"#));

        let materials = &rendered.materials_xml;
        assert!(materials.contains(r#"<material name="Steel">"#));
        assert!(materials.contains(r#"name="Steel_contact_coefficients""#));
        assert!(materials.contains(r#"mu="0.8""#));
    }

    #[test]
    fn test_export_writes_package() {
        let temp = TempDir::new().unwrap();
        let snapshot = AssemblySnapshot::from_json(ARM).unwrap();

        let summary = export(&snapshot, &settings(temp.path())).unwrap();
        assert_eq!(summary.links, 2);
        assert_eq!(summary.joints, 1);
        assert_eq!(summary.materials, 1);
        assert_eq!(summary.package_path, temp.path().join("arm_description"));

        let written = std::fs::read_to_string(&summary.robot_path).unwrap();
        let parsed = Robot::from_xml(&written).unwrap();
        assert!(parsed.find_link("Arm_v1:1_link").is_some());
        assert_eq!(parsed.find_joint("Rev_1_joint").unwrap().parent.link, "base_link");
        assert!(summary.materials_path.is_file());
        assert!(summary.package_path.join("package.xml").is_file());
    }

    #[test]
    fn test_invalid_input_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let mut snapshot = AssemblySnapshot::from_json(ARM).unwrap();
        snapshot.materials[0].color = None;

        let err = export(&snapshot, &settings(temp.path())).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(!temp.path().join("arm_description").exists());
    }

    #[test]
    fn test_settings_validation() {
        let snapshot = AssemblySnapshot::from_json(ARM).unwrap();

        let mut bad = ExportSettings::new("my robot", "out", "Base v1:1");
        assert!(matches!(render(&snapshot, &bad), Err(ExportError::InvalidSettings(_))));

        bad.robot_name = String::new();
        assert!(matches!(render(&snapshot, &bad), Err(ExportError::InvalidSettings(_))));

        let no_base = ExportSettings::new("arm", "out", "");
        assert!(matches!(render(&snapshot, &no_base), Err(ExportError::InvalidSettings(_))));
    }

    #[test]
    fn test_base_footprint_export() {
        let snapshot = AssemblySnapshot::from_json(ARM).unwrap();
        let mut settings = settings(std::path::Path::new("out"));
        settings.base_footprint = Some(Transform::from_translation(0.0, 0.0, -5.0));

        let rendered = render(&snapshot, &settings).unwrap();
        assert_eq!(rendered.tree.root(), "base_footprint");
        assert!(rendered
            .robot_xml
            .contains(r#"<joint name="base_footprint_joint" type="fixed">"#));
        assert!(rendered.robot_xml.contains(r#"<origin xyz="0.0 0.0 0.05" rpy="0.0 0.0 0.0"/>"#));
    }
}
