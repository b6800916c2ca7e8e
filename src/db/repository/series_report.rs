//! Persistence of one decoded series report. Everything for a series goes
//! in one transaction, keyed by its series UID; absent categories leave
//! NULL flags and no rows, never zeros.

use std::collections::BTreeMap;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{
    CategoryMeasurements, CoronaryCalcium, LungLesions, LungRegionDensity, MeasurementCategory,
    SeriesReport, VertebraMeasurement,
};

const AORTA_COLUMNS: [&str; 11] = [
    "max_ascending",
    "max_descending",
    "sinus_of_valsalva",
    "sinotubular_junction",
    "mid_ascending",
    "proximal_arch",
    "mid_arch",
    "proximal_descending",
    "mid_descending",
    "diaphragm_level",
    "celiac_artery_origin",
];

pub fn insert_series_report(
    conn: &mut Connection,
    report: &SeriesReport,
) -> Result<(), DatabaseError> {
    let Some(series_uid) = report.identifiers.series_uid.as_deref() else {
        return Err(DatabaseError::ConstraintViolation(
            "series report has no series UID".to_string(),
        ));
    };

    let tx = conn.transaction()?;

    let flag = |category: MeasurementCategory| -> Option<i64> {
        report.has(category).then_some(1)
    };
    let lung_flag: Option<i64> = (report.has(MeasurementCategory::LungParenchyma)
        || report.has(MeasurementCategory::PulmonaryDensities))
    .then_some(1);

    tx.execute(
        "INSERT OR REPLACE INTO main
         (series_uid, mrn, accession, study_date, sex, aorta, spine, cardio, lesions, lung)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            series_uid,
            report.identifiers.mrn,
            report.identifiers.accession,
            report.identifiers.study_date,
            report.identifiers.sex,
            flag(MeasurementCategory::AorticDiameters),
            flag(MeasurementCategory::SpineMeasurements),
            flag(MeasurementCategory::CoronaryCalcium),
            flag(MeasurementCategory::LungLesions),
            lung_flag,
        ],
    )?;

    for measurements in report.categories.values() {
        match measurements {
            CategoryMeasurements::AorticDiameters(diameters) => {
                insert_aorta(&tx, series_uid, diameters)?;
            }
            CategoryMeasurements::CoronaryCalcium(cardio) => {
                insert_cardio(&tx, series_uid, cardio)?;
            }
            CategoryMeasurements::LungLesions(lesions) => {
                insert_lesions(&tx, series_uid, lesions)?;
            }
            CategoryMeasurements::LungParenchyma(rows)
            | CategoryMeasurements::PulmonaryDensities(rows) => {
                insert_lung(&tx, series_uid, rows)?;
            }
            CategoryMeasurements::SpineMeasurements(rows) => {
                insert_spine(&tx, series_uid, rows)?;
            }
        }
    }

    tx.commit()?;
    Ok(())
}

fn insert_aorta(
    tx: &rusqlite::Transaction<'_>,
    series_uid: &str,
    diameters: &BTreeMap<String, i64>,
) -> Result<(), DatabaseError> {
    // Synthesized unknown-site keys have no column; they stay in the JSON
    // export only.
    for key in diameters.keys() {
        if !AORTA_COLUMNS.contains(&key.as_str()) {
            tracing::warn!(series_uid, location = %key, "aortic site has no column, not persisted");
        }
    }

    let col = |name: &str| diameters.get(name).copied();
    tx.execute(
        "INSERT OR REPLACE INTO aorta
         (series_uid, max_ascending, max_descending, sinus_of_valsalva, sinotubular_junction,
          mid_ascending, proximal_arch, mid_arch, proximal_descending, mid_descending,
          diaphragm_level, celiac_artery_origin)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            series_uid,
            col("max_ascending"),
            col("max_descending"),
            col("sinus_of_valsalva"),
            col("sinotubular_junction"),
            col("mid_ascending"),
            col("proximal_arch"),
            col("mid_arch"),
            col("proximal_descending"),
            col("mid_descending"),
            col("diaphragm_level"),
            col("celiac_artery_origin"),
        ],
    )?;
    Ok(())
}

fn insert_cardio(
    tx: &rusqlite::Transaction<'_>,
    series_uid: &str,
    cardio: &CoronaryCalcium,
) -> Result<(), DatabaseError> {
    tx.execute(
        "INSERT OR REPLACE INTO cardio
         (series_uid, heart_volume_cm3, coronary_calcification_volume_mm3)
         VALUES (?1, ?2, ?3)",
        params![
            series_uid,
            cardio.heart_volume_cm3,
            cardio.coronary_calcification_volume_mm3,
        ],
    )?;
    Ok(())
}

fn insert_lesions(
    tx: &rusqlite::Transaction<'_>,
    series_uid: &str,
    lesions: &LungLesions,
) -> Result<(), DatabaseError> {
    for (lesion_id, lesion) in &lesions.lesions {
        tx.execute(
            "INSERT OR REPLACE INTO lesions
             (series_uid, lesion_id, location, review_status, max_2d_diameter_mm,
              min_2d_diameter_mm, mean_2d_diameter_mm, max_3d_diameter_mm, volume_mm3)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                series_uid,
                lesion_id,
                lesion.location,
                lesion.review_status,
                lesion.max_2d_diameter_mm,
                lesion.min_2d_diameter_mm,
                lesion.mean_2d_diameter_mm,
                lesion.max_3d_diameter_mm,
                lesion.volume_mm3,
            ],
        )?;
    }
    Ok(())
}

fn insert_lung(
    tx: &rusqlite::Transaction<'_>,
    series_uid: &str,
    rows: &[LungRegionDensity],
) -> Result<(), DatabaseError> {
    for row in rows {
        tx.execute(
            "INSERT OR REPLACE INTO lung
             (series_uid, location, opacity_score, volume_cm3, opacity_volume_cm3,
              opacity_percent, high_opacity_volume_cm3, high_opacity_percent, mean_hu,
              mean_hu_opacity, low_parenchyma_hu_percent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                series_uid,
                row.location,
                row.opacity_score,
                row.volume_cm3,
                row.opacity_volume_cm3,
                row.opacity_percent,
                row.high_opacity_volume_cm3,
                row.high_opacity_percent,
                row.mean_hu,
                row.mean_hu_opacity,
                row.low_parenchyma_hu_percent,
            ],
        )?;
    }
    Ok(())
}

fn insert_spine(
    tx: &rusqlite::Transaction<'_>,
    series_uid: &str,
    rows: &[VertebraMeasurement],
) -> Result<(), DatabaseError> {
    for row in rows {
        tx.execute(
            "INSERT OR REPLACE INTO spine
             (series_uid, vertebra, direction, length_mm, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![series_uid, row.vertebra, row.direction, row.length_mm, row.status],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{LesionMeasurements, SeriesIdentifiers};

    fn identifiers() -> SeriesIdentifiers {
        SeriesIdentifiers {
            mrn: Some("MRN001".to_string()),
            accession: Some("ACC123".to_string()),
            series_uid: Some("1.2.3.4".to_string()),
            sex: Some("F".to_string()),
            study_date: Some("2024-01-15".to_string()),
        }
    }

    fn report_with(categories: Vec<CategoryMeasurements>) -> SeriesReport {
        SeriesReport {
            identifiers: identifiers(),
            categories: categories
                .into_iter()
                .map(|m| (m.category(), m))
                .collect(),
        }
    }

    #[test]
    fn absent_categories_leave_null_flags() {
        let mut conn = open_memory_database().unwrap();
        let mut diameters = BTreeMap::new();
        diameters.insert("max_ascending".to_string(), 32);
        let report = report_with(vec![CategoryMeasurements::AorticDiameters(diameters)]);
        insert_series_report(&mut conn, &report).unwrap();

        let (aorta, cardio, lung): (Option<i64>, Option<i64>, Option<i64>) = conn
            .query_row(
                "SELECT aorta, cardio, lung FROM main WHERE series_uid = '1.2.3.4'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(aorta, Some(1));
        assert_eq!(cardio, None);
        assert_eq!(lung, None);
    }

    #[test]
    fn aorta_row_maps_known_locations_to_columns() {
        let mut conn = open_memory_database().unwrap();
        let mut diameters = BTreeMap::new();
        diameters.insert("max_ascending".to_string(), 32);
        diameters.insert("Z9, Unusual Site".to_string(), 19);
        let report = report_with(vec![CategoryMeasurements::AorticDiameters(diameters)]);
        insert_series_report(&mut conn, &report).unwrap();

        let (max_asc, max_desc): (Option<i64>, Option<i64>) = conn
            .query_row(
                "SELECT max_ascending, max_descending FROM aorta WHERE series_uid = '1.2.3.4'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(max_asc, Some(32));
        assert_eq!(max_desc, None);
    }

    #[test]
    fn lesion_rows_keyed_by_series_and_lesion_id() {
        let mut conn = open_memory_database().unwrap();
        let mut lesions = BTreeMap::new();
        lesions.insert(
            "Lesion 1".to_string(),
            LesionMeasurements {
                location: Some("Right upper lobe".to_string()),
                review_status: Some("accepted".to_string()),
                volume_mm3: Some(920.4),
                ..LesionMeasurements::default()
            },
        );
        lesions.insert("Lesion 2".to_string(), LesionMeasurements::default());
        let report = report_with(vec![CategoryMeasurements::LungLesions(LungLesions {
            lesion_count: 3,
            lesions,
        })]);
        insert_series_report(&mut conn, &report).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM lesions WHERE series_uid = '1.2.3.4'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(rows, 2);

        let volume: Option<f64> = conn
            .query_row(
                "SELECT volume_mm3 FROM lesions WHERE lesion_id = 'Lesion 1'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(volume, Some(920.4));
    }

    #[test]
    fn empty_cardio_result_still_marks_presence() {
        let mut conn = open_memory_database().unwrap();
        let report = report_with(vec![CategoryMeasurements::CoronaryCalcium(
            CoronaryCalcium::default(),
        )]);
        insert_series_report(&mut conn, &report).unwrap();

        let cardio_flag: Option<i64> = conn
            .query_row("SELECT cardio FROM main WHERE series_uid = '1.2.3.4'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(cardio_flag, Some(1));

        let heart: Option<f64> = conn
            .query_row(
                "SELECT heart_volume_cm3 FROM cardio WHERE series_uid = '1.2.3.4'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(heart, None);
    }

    #[test]
    fn missing_series_uid_is_a_constraint_violation() {
        let mut conn = open_memory_database().unwrap();
        let mut report = report_with(vec![]);
        report.identifiers.series_uid = None;
        let err = insert_series_report(&mut conn, &report).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn reinserting_a_series_is_idempotent() {
        let mut conn = open_memory_database().unwrap();
        let report = report_with(vec![CategoryMeasurements::CoronaryCalcium(CoronaryCalcium {
            heart_volume_cm3: Some(612.5),
            coronary_calcification_volume_mm3: None,
        })]);
        insert_series_report(&mut conn, &report).unwrap();
        insert_series_report(&mut conn, &report).unwrap();

        let main_rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM main", [], |r| r.get(0))
            .unwrap();
        let cardio_rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM cardio", [], |r| r.get(0))
            .unwrap();
        assert_eq!(main_rows, 1);
        assert_eq!(cardio_rows, 1);
    }
}
