use serde::{Deserialize, Serialize};

/// The closed set of measurement categories an automated chest-CT report
/// can carry. Ord so that aggregated maps iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementCategory {
    AorticDiameters,
    CoronaryCalcium,
    LungLesions,
    LungParenchyma,
    PulmonaryDensities,
    SpineMeasurements,
}

impl MeasurementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AorticDiameters => "aortic_diameters",
            Self::CoronaryCalcium => "coronary_calcium",
            Self::LungLesions => "lung_lesions",
            Self::LungParenchyma => "lung_parenchyma",
            Self::PulmonaryDensities => "pulmonary_densities",
            Self::SpineMeasurements => "spine_measurements",
        }
    }
}

impl std::fmt::Display for MeasurementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&MeasurementCategory::AorticDiameters).unwrap();
        assert_eq!(json, "\"aortic_diameters\"");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(
            MeasurementCategory::LungLesions.to_string(),
            MeasurementCategory::LungLesions.as_str()
        );
    }
}
