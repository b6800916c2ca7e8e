//! Category classification and measurement-holder location. Both run before
//! any category-specific extraction and both fail recoverably.

use super::codes;
use super::{CodedNode, InstanceSkip};
use crate::models::MeasurementCategory;

/// Resolve which measurement category an instance carries by inspecting the
/// concept-value code of the first root content node.
pub fn classify_instance(content: &[CodedNode]) -> Result<MeasurementCategory, InstanceSkip> {
    let leading = content.first().ok_or(InstanceSkip::MissingCategoryCode)?;
    let code = leading
        .value_code
        .as_deref()
        .ok_or(InstanceSkip::MissingCategoryCode)?;
    codes::category_for_code(code)
        .ok_or_else(|| InstanceSkip::UnknownCategoryCode(code.to_string()))
}

/// Find the node that roots the category-specific payload. Every category
/// nests its real measurements one level below the classification node,
/// under the image-measurement role.
pub fn find_measurement_holder(content: &[CodedNode]) -> Result<&CodedNode, InstanceSkip> {
    content
        .iter()
        .find(|node| node.has_role(codes::IMAGE_MEASUREMENT))
        .filter(|holder| !holder.children.is_empty())
        .ok_or(InstanceSkip::MissingMeasurementHolder)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with_value_code(code: &str) -> CodedNode {
        CodedNode {
            value_code: Some(code.to_string()),
            ..CodedNode::default()
        }
    }

    #[test]
    fn classifies_known_category() {
        let content = vec![node_with_value_code("CHESTCT0410")];
        assert_eq!(
            classify_instance(&content).unwrap(),
            MeasurementCategory::AorticDiameters
        );
    }

    #[test]
    fn missing_value_code_is_recoverable() {
        let content = vec![CodedNode::default()];
        assert_eq!(
            classify_instance(&content).unwrap_err(),
            InstanceSkip::MissingCategoryCode
        );
    }

    #[test]
    fn empty_content_is_recoverable() {
        assert_eq!(
            classify_instance(&[]).unwrap_err(),
            InstanceSkip::MissingCategoryCode
        );
    }

    #[test]
    fn unknown_code_names_the_code() {
        let content = vec![node_with_value_code("CHESTCT1234")];
        assert_eq!(
            classify_instance(&content).unwrap_err(),
            InstanceSkip::UnknownCategoryCode("CHESTCT1234".to_string())
        );
    }

    #[test]
    fn finds_holder_by_role() {
        let content = vec![
            node_with_value_code("CHESTCT0410"),
            CodedNode {
                name_code: Some(codes::IMAGE_MEASUREMENT.to_string()),
                children: vec![CodedNode::default()],
                ..CodedNode::default()
            },
        ];
        let holder = find_measurement_holder(&content).unwrap();
        assert_eq!(holder.children.len(), 1);
    }

    #[test]
    fn holder_without_children_is_recoverable() {
        let content = vec![CodedNode {
            name_code: Some(codes::IMAGE_MEASUREMENT.to_string()),
            ..CodedNode::default()
        }];
        assert_eq!(
            find_measurement_holder(&content).unwrap_err(),
            InstanceSkip::MissingMeasurementHolder
        );
    }

    #[test]
    fn no_holder_is_recoverable() {
        let content = vec![node_with_value_code("CHESTCT0410")];
        assert_eq!(
            find_measurement_holder(&content).unwrap_err(),
            InstanceSkip::MissingMeasurementHolder
        );
    }
}
