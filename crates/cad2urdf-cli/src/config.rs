//! Configuration loading

use anyhow::{Context, Result};
use cad2urdf_core::{
    CoefficientRow, CoefficientTable, DynamicsRow, DynamicsTable, ExportSettings, Transform,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub joint_dynamics: Vec<DynamicsRow>,
    #[serde(default)]
    pub contact_coefficients: Vec<CoefficientRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Robot name, also names the `<name>_description` package
    #[serde(default = "default_robot_name")]
    pub name: String,
    /// Occurrence that becomes base_link
    #[serde(default)]
    pub base_link: String,
    /// World position of base_footprint in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_footprint: Option<[f64; 3]>,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            name: default_robot_name(),
            base_link: String::new(),
            base_footprint: None,
        }
    }
}

fn default_robot_name() -> String {
    "my_robot".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the description package is written to
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> String {
    "./export".to_string()
}

impl Config {
    /// Convert to ExportSettings
    pub fn to_export_settings(&self) -> ExportSettings {
        let mut settings =
            ExportSettings::new(&self.robot.name, &self.output.path, &self.robot.base_link);
        settings.base_footprint = self
            .robot
            .base_footprint
            .map(|[x, y, z]| Transform::from_translation(x, y, z));
        settings.dynamics = DynamicsTable::new(self.joint_dynamics.clone());
        settings.coefficients = CoefficientTable::new(self.contact_coefficients.clone());
        settings
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Replace the settings' tables with the ones loaded from standalone TOML files
pub fn load_tables(
    settings: &mut ExportSettings,
    dynamics: Option<&Path>,
    coefficients: Option<&Path>,
) -> Result<()> {
    if let Some(path) = dynamics {
        settings.dynamics = DynamicsTable::from_file(path)
            .with_context(|| format!("loading dynamics table {}", path.display()))?;
        info!(path = %path.display(), rows = settings.dynamics.joint.len(), "Loaded dynamics table");
    }
    if let Some(path) = coefficients {
        settings.coefficients = CoefficientTable::from_file(path)
            .with_context(|| format!("loading coefficient table {}", path.display()))?;
        info!(
            path = %path.display(),
            rows = settings.coefficients.rows().len(),
            "Loaded coefficient table"
        );
    }
    Ok(())
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let config = Config {
        robot: RobotConfig {
            name: default_robot_name(),
            base_link: "Base v1:1".to_string(),
            base_footprint: Some([0.0, 0.0, 0.0]),
        },
        output: OutputConfig::default(),
        joint_dynamics: vec![DynamicsRow {
            joint: "Rev1".to_string(),
            friction: Some(0.1.into()),
            damping: Some(0.5.into()),
        }],
        contact_coefficients: vec![CoefficientRow {
            material: "Steel".to_string(),
            mu: Some(0.8.into()),
            kp: Some(1000000.0.into()),
            kd: None,
        }],
    };

    let content = toml::to_string_pretty(&config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.robot.name, "my_robot");
        assert_eq!(config.output.path, "./export");
        assert!(config.joint_dynamics.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[robot]
name = "rover"
base_link = "Chassis v3:1"
base_footprint = [0.0, 0.0, -4.5]

[output]
path = "/tmp/rover"

[[joint_dynamics]]
joint = "Wheel FL"
friction = 0.05
damping = "0.2"

[[contact_coefficients]]
material = "Rubber"
mu = 1.2
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let settings = config.to_export_settings();

        assert_eq!(settings.robot_name, "rover");
        assert_eq!(settings.base_link, "Chassis v3:1");
        assert_eq!(settings.export_path, Path::new("/tmp/rover"));
        assert_eq!(settings.base_footprint.unwrap().translation().z, -4.5);

        let dynamics = settings.dynamics.lookup("Wheel_FL").unwrap().unwrap();
        assert_eq!(dynamics.damping, 0.2);
        assert_eq!(settings.coefficients.rows().len(), 1);
    }

    #[test]
    fn test_default_config_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cad2urdf.toml");

        save_default_config(&path).unwrap();
        let config = load_config(&path).unwrap();

        assert_eq!(config.robot.base_link, "Base v1:1");
        assert_eq!(config.robot.base_footprint, Some([0.0, 0.0, 0.0]));
        assert_eq!(config.joint_dynamics.len(), 1);
        assert_eq!(config.contact_coefficients[0].material, "Steel");
        assert!(config.to_export_settings().validate().is_ok());
    }

    #[test]
    fn test_table_files_replace_config_rows() {
        let temp = TempDir::new().unwrap();
        let dynamics = temp.path().join("dynamics.toml");
        std::fs::write(&dynamics, "[[joint]]\njoint = \"Elbow\"\nfriction = 0.3\ndamping = 0.4\n").unwrap();
        let coefficients = temp.path().join("coefficients.toml");
        std::fs::write(&coefficients, "[[material]]\nmaterial = \"Rubber\"\nmu = 1.1\n").unwrap();

        save_default_config(&temp.path().join("cad2urdf.toml")).unwrap();
        let mut settings = load_config(&temp.path().join("cad2urdf.toml"))
            .unwrap()
            .to_export_settings();

        load_tables(&mut settings, Some(dynamics.as_path()), Some(coefficients.as_path())).unwrap();
        assert!(settings.dynamics.lookup("Rev1").unwrap().is_none());
        assert_eq!(settings.dynamics.lookup("Elbow").unwrap().unwrap().damping, 0.4);
        assert_eq!(settings.coefficients.rows().len(), 1);
        assert_eq!(settings.coefficients.rows()[0].material, "Rubber");
    }

    #[test]
    fn test_table_files_optional() {
        let mut settings = Config::default().to_export_settings();
        load_tables(&mut settings, None, None).unwrap();
        assert!(settings.dynamics.joint.is_empty());

        let temp = TempDir::new().unwrap();
        let absent = temp.path().join("absent.toml");
        let err = load_tables(&mut settings, Some(absent.as_path()), None).unwrap_err();
        assert!(err.to_string().contains("loading dynamics table"));
    }
}
