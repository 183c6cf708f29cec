//! ROS 2 description package layout
//!
//! An export writes a self-contained `<robot>_description` package:
//!
//! ```text
//! <export>/<robot>_description/
//!   package.xml
//!   CMakeLists.txt
//!   launch/display.launch.py
//!   meshes/
//!   urdf/<robot>.urdf.xacro
//!   urdf/materials.xacro
//! ```
//!
//! Existing files are overwritten.

use std::path::{Path, PathBuf};
use tracing::debug;

const ROBOT_PLACEHOLDER: &str = "@ROBOT@";

const PACKAGE_XML: &str = r#"<?xml version="1.0"?>
<?xml-model href="http://download.ros.org/schema/package_format3.xsd" schematypens="http://www.w3.org/2001/XMLSchema"?>
<package format="3">
  <name>@ROBOT@_description</name>
  <version>0.0.0</version>
  <description>URDF description of @ROBOT@</description>
  <maintainer email="user@example.com">user</maintainer>
  <license>Apache-2.0</license>

  <buildtool_depend>ament_cmake</buildtool_depend>

  <exec_depend>robot_state_publisher</exec_depend>
  <exec_depend>joint_state_publisher_gui</exec_depend>
  <exec_depend>rviz2</exec_depend>
  <exec_depend>xacro</exec_depend>

  <export>
    <build_type>ament_cmake</build_type>
  </export>
</package>
"#;

const CMAKE_LISTS: &str = r#"cmake_minimum_required(VERSION 3.8)
project(@ROBOT@_description)

find_package(ament_cmake REQUIRED)

install(
  DIRECTORY launch meshes urdf
  DESTINATION share/${PROJECT_NAME}
)

ament_package()
"#;

const DISPLAY_LAUNCH: &str = r#"import os

from ament_index_python.packages import get_package_share_directory
from launch import LaunchDescription
from launch_ros.actions import Node
import xacro


def generate_launch_description():
    share_dir = get_package_share_directory('@ROBOT@_description')
    xacro_file = os.path.join(share_dir, 'urdf', '@ROBOT@.urdf.xacro')
    robot_description = xacro.process_file(xacro_file).toxml()

    return LaunchDescription([
        Node(
            package='robot_state_publisher',
            executable='robot_state_publisher',
            name='robot_state_publisher',
            output='screen',
            parameters=[{'robot_description': robot_description}],
        ),
        Node(
            package='joint_state_publisher_gui',
            executable='joint_state_publisher_gui',
            name='joint_state_publisher_gui',
        ),
        Node(
            package='rviz2',
            executable='rviz2',
            name='rviz2',
            output='screen',
        ),
    ])
"#;

fn fill(template: &str, robot_name: &str) -> String {
    template.replace(ROBOT_PLACEHOLDER, robot_name)
}

/// Contents of `package.xml`
pub fn package_xml(robot_name: &str) -> String {
    fill(PACKAGE_XML, robot_name)
}

/// Contents of `CMakeLists.txt`
pub fn cmake_lists(robot_name: &str) -> String {
    fill(CMAKE_LISTS, robot_name)
}

/// Contents of `launch/display.launch.py`
pub fn display_launch(robot_name: &str) -> String {
    fill(DISPLAY_LAUNCH, robot_name)
}

/// Paths of a description package under an export directory
#[derive(Debug, Clone)]
pub struct PackageLayout {
    root: PathBuf,
    robot_name: String,
}

impl PackageLayout {
    pub fn new(export_path: impl AsRef<Path>, robot_name: &str) -> Self {
        Self {
            root: export_path
                .as_ref()
                .join(format!("{}_description", robot_name)),
            robot_name: robot_name.to_string(),
        }
    }

    /// ROS package name
    pub fn package_name(&self) -> String {
        format!("{}_description", self.robot_name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn urdf_dir(&self) -> PathBuf {
        self.root.join("urdf")
    }

    pub fn meshes_dir(&self) -> PathBuf {
        self.root.join("meshes")
    }

    pub fn launch_dir(&self) -> PathBuf {
        self.root.join("launch")
    }

    pub fn robot_path(&self) -> PathBuf {
        self.urdf_dir().join(format!("{}.urdf.xacro", self.robot_name))
    }

    pub fn materials_path(&self) -> PathBuf {
        self.urdf_dir().join("materials.xacro")
    }

    /// `filename` of the include that pulls `materials.xacro` into the robot
    pub fn materials_include(&self) -> String {
        format!("$(find {})/urdf/materials.xacro", self.package_name())
    }

    /// Create the directory tree and the static package files
    pub fn create(&self) -> std::io::Result<()> {
        for dir in [self.urdf_dir(), self.meshes_dir(), self.launch_dir()] {
            std::fs::create_dir_all(&dir)?;
        }

        std::fs::write(self.root.join("package.xml"), package_xml(&self.robot_name))?;
        std::fs::write(self.root.join("CMakeLists.txt"), cmake_lists(&self.robot_name))?;
        std::fs::write(
            self.launch_dir().join("display.launch.py"),
            display_launch(&self.robot_name),
        )?;

        debug!(path = %self.root.display(), "Created package skeleton");
        Ok(())
    }

    /// Write the generated robot and materials documents
    pub fn write_documents(&self, robot_xml: &str, materials_xml: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(self.urdf_dir())?;
        std::fs::write(self.robot_path(), robot_xml)?;
        std::fs::write(self.materials_path(), materials_xml)?;
        Ok(())
    }
}
