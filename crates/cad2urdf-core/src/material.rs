//! Material colors and contact coefficients (`materials.xacro`)

use tracing::debug;

use crate::error::ExportError;
use crate::frame::format_number;
use crate::host::{AssemblyHost, Material};
use crate::model::sanitize_name;
use crate::tables::CoefficientTable;
use crate::urdf::{Color, ContactCoefficients, Robot, XacroProperty};

/// `rgba` attribute for a 0..=255 color
pub fn rgba_string(color: [u8; 4]) -> String {
    color
        .iter()
        .map(|c| format_number(f64::from(*c) / 255.0))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `<material>` element for a host material. A material without a color
/// property is invalid input.
pub fn material_element(material: &Material) -> Result<crate::urdf::Material, ExportError> {
    let color = material
        .color
        .ok_or_else(|| ExportError::material(&material.name, "no color property"))?;

    Ok(crate::urdf::Material {
        name: sanitize_name(&material.name),
        color: Color {
            rgba: rgba_string(color),
        },
    })
}

/// `xacro:property` elements for every coefficient row with at least one
/// non-zero value
pub fn contact_properties(table: &CoefficientTable) -> Result<Vec<XacroProperty>, ExportError> {
    let mut properties = Vec::new();

    for row in table.rows() {
        let coefficients = row.coefficients()?;
        if coefficients.is_empty() {
            debug!(material = %row.material, "No contact coefficients, skipping");
            continue;
        }

        properties.push(XacroProperty {
            name: format!("{}_contact_coefficients", sanitize_name(&row.material)),
            contact_coefficients: ContactCoefficients {
                mu: coefficients.mu.map(format_number),
                kp: coefficients.kp.map(format_number),
                kd: coefficients.kd.map(format_number),
            },
        });
    }

    Ok(properties)
}

/// Build the materials document for every material the host reports
pub fn build_materials<H: AssemblyHost + ?Sized>(
    host: &H,
    robot_name: &str,
    coefficients: &CoefficientTable,
) -> Result<Robot, ExportError> {
    let mut doc = Robot::xacro(robot_name);

    for material in host.materials()? {
        doc.material.push(material_element(&material)?);
    }
    doc.property = contact_properties(coefficients)?;

    debug!(
        materials = doc.material.len(),
        properties = doc.property.len(),
        "Built materials document"
    );
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::AssemblySnapshot;
    use crate::tables::CoefficientRow;

    #[test]
    fn test_rgba_scaling() {
        assert_eq!(rgba_string([255, 0, 51, 255]), "1.0 0.0 0.2 1.0");
        assert_eq!(rgba_string([128, 128, 128, 255]), "0.501961 0.501961 0.501961 1.0");
    }

    #[test]
    fn test_material_name_sanitized() {
        let element = material_element(&Material {
            name: "Paint Enamel Glossy".to_string(),
            color: Some([0, 0, 255, 255]),
        })
        .unwrap();
        assert_eq!(element.name, "Paint_Enamel_Glossy");
        assert_eq!(element.color.rgba, "0.0 0.0 1.0 1.0");
    }

    #[test]
    fn test_missing_color_is_invalid() {
        let err = material_element(&Material {
            name: "Glass".to_string(),
            color: None,
        })
        .unwrap_err();
        assert!(matches!(err, ExportError::InvalidMaterial { ref name, .. } if name == "Glass"));
    }

    #[test]
    fn test_contact_properties() {
        let table = CoefficientTable::new(vec![
            CoefficientRow {
                material: "Rubber".to_string(),
                mu: Some(1.1.into()),
                kp: Some(0.0.into()),
                kd: None,
            },
            CoefficientRow {
                material: "Steel".to_string(),
                mu: None,
                kp: Some("".into()),
                kd: Some(0.0.into()),
            },
        ]);

        let properties = contact_properties(&table).unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].name, "Rubber_contact_coefficients");
        assert_eq!(properties[0].contact_coefficients.mu.as_deref(), Some("1.1"));
        assert_eq!(properties[0].contact_coefficients.kp, None);
        assert_eq!(properties[0].contact_coefficients.kd, None);
    }

    #[test]
    fn test_build_materials_document() {
        let snapshot = AssemblySnapshot::from_json(
            r#"{ "materials": [ { "name": "ABS Plastic", "color": [255, 255, 255, 255] } ] }"#,
        )
        .unwrap();

        let doc = build_materials(&snapshot, "bot", &CoefficientTable::default()).unwrap();
        let xml = doc.to_xml().unwrap();
        assert!(xml.contains(r#"<material name="ABS_Plastic">"#));
        assert!(xml.contains(r#"rgba="1.0 1.0 1.0 1.0""#));
        assert!(!xml.contains("xacro:property"));
    }

    #[test]
    fn test_coefficient_rounding_to_zero_is_omitted() {
        let table = CoefficientTable::new(vec![CoefficientRow {
            material: "Rubber".to_string(),
            mu: Some(1e-7.into()),
            kp: Some("1e6".into()),
            kd: None,
        }]);

        let doc = build_materials(&AssemblySnapshot::default(), "bot", &table).unwrap();
        let xml = doc.to_xml().unwrap();
        assert!(xml.contains(r#"<contact_coefficients kp="1000000.0"/>"#));
        assert!(!xml.contains("mu="));
    }
}
