//! Built-in reference catalog: categories, exams and their ranges.
//!
//! The catalog also carries the checkup-profile table (profile name to
//! ordered category list) and the default profile descriptions used when
//! seeding the profile store.

use crate::types::ReferenceRange;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<ReferenceCatalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static ReferenceCatalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog
///
/// **Note**: For production use, prefer `get_default_catalog()` which
/// returns a cached reference. This function is retained for testing and
/// custom catalog creation.
pub fn build_default_catalog() -> ReferenceCatalog {
    build_default_catalog_internal()
}

/// The complete static catalog consumed read-only by the rest of the
/// system. Never mutated at runtime.
#[derive(Clone, Debug)]
pub struct ReferenceCatalog {
    /// category name -> exam name -> reference range
    pub ranges: BTreeMap<String, BTreeMap<String, ReferenceRange>>,
    /// checkup profile name -> ordered category names
    pub checkup_profiles: BTreeMap<String, Vec<String>>,
    /// checkup profile name -> default description
    pub descriptions: BTreeMap<String, String>,
}

impl ReferenceCatalog {
    /// Look up the range for one (category, exam) pair
    pub fn range(&self, category: &str, exam: &str) -> Option<&ReferenceRange> {
        self.ranges.get(category)?.get(exam)
    }

    /// Exam names for one category, if the category exists
    pub fn exams(&self, category: &str) -> Option<Vec<&str>> {
        self.ranges
            .get(category)
            .map(|exams| exams.keys().map(String::as_str).collect())
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (category, exams) in &self.ranges {
            if category.is_empty() {
                errors.push("catalog has a category with an empty name".to_string());
            }
            if exams.is_empty() {
                errors.push(format!("category '{category}' has no exams"));
            }
            for (exam, range) in exams {
                if exam.is_empty() {
                    errors.push(format!("category '{category}' has an exam with an empty name"));
                }
                if range.unit.is_empty() {
                    errors.push(format!("exam '{category}/{exam}' has an empty unit"));
                }
                if let (Some(min), Some(max)) = (range.min, range.max) {
                    if min > max {
                        errors.push(format!(
                            "exam '{category}/{exam}': min {min} > max {max}"
                        ));
                    }
                }
            }
        }

        for (profile, categories) in &self.checkup_profiles {
            if categories.is_empty() {
                errors.push(format!("checkup profile '{profile}' lists no categories"));
            }
            for category in categories {
                if !self.ranges.contains_key(category) {
                    errors.push(format!(
                        "checkup profile '{profile}' references unknown category '{category}'"
                    ));
                }
            }
        }

        for profile in self.descriptions.keys() {
            if !self.checkup_profiles.contains_key(profile) {
                errors.push(format!(
                    "description for unknown checkup profile '{profile}'"
                ));
            }
        }

        errors
    }
}

fn range(min: f64, max: f64, unit: &str) -> ReferenceRange {
    ReferenceRange {
        min: Some(min),
        max: Some(max),
        unit: unit.to_string(),
        ..Default::default()
    }
}

fn category(entries: &[(&str, f64, f64, &str)]) -> BTreeMap<String, ReferenceRange> {
    entries
        .iter()
        .map(|&(exam, min, max, unit)| (exam.to_string(), range(min, max, unit)))
        .collect()
}

/// Internal function that actually builds the catalog
fn build_default_catalog_internal() -> ReferenceCatalog {
    let mut ranges = BTreeMap::new();

    ranges.insert(
        "HEMOGRAMA".to_string(),
        category(&[
            ("Hemoglobina", 13.5, 17.5, "g/dL"),
            ("Hematócrito", 41.0, 53.0, "%"),
            ("Leucócitos", 4.0, 10.0, "x 10³/µL"),
            ("Plaquetas", 150.0, 450.0, "x 10³/µL"),
            ("VCM", 80.0, 100.0, "fL"),
            ("HCM", 27.0, 32.0, "pg"),
            ("CHCM", 32.0, 36.0, "g/dL"),
            ("RDW", 11.5, 14.5, "%"),
            ("VPM", 7.2, 11.1, "fL"),
        ]),
    );

    ranges.insert(
        "GLICEMIA".to_string(),
        category(&[
            ("Glicose", 70.0, 99.0, "mg/dL"),
            ("Hemoglobina Glicada", 4.0, 5.7, "%"),
            ("Insulina", 2.6, 24.9, "µU/mL"),
        ]),
    );

    ranges.insert(
        "FUNÇÃO RENAL".to_string(),
        category(&[
            ("Creatinina", 0.7, 1.2, "mg/dL"),
            ("Ureia", 15.0, 45.0, "mg/dL"),
        ]),
    );

    // Zero lower bounds below are deliberate real bounds.
    ranges.insert(
        "PERFIL LIPÍDICO".to_string(),
        category(&[
            ("Colesterol Total", 0.0, 200.0, "mg/dL"),
            ("HDL", 40.0, 60.0, "mg/dL"),
            ("LDL", 0.0, 130.0, "mg/dL"),
            ("Triglicerídeos", 0.0, 150.0, "mg/dL"),
        ]),
    );

    ranges.insert(
        "FUNÇÃO TIREOIDEANA".to_string(),
        category(&[
            ("TSH", 0.4, 4.0, "mUI/L"),
            ("T4 Livre", 0.8, 1.8, "ng/dL"),
            ("T3", 80.0, 200.0, "ng/dL"),
        ]),
    );

    ranges.insert(
        "PSA".to_string(),
        category(&[
            ("PSA Total", 0.0, 4.0, "ng/mL"),
            ("PSA Livre", 0.0, 1.0, "ng/mL"),
        ]),
    );

    ranges.insert(
        "HORMÔNIOS FEMININOS".to_string(),
        category(&[
            ("Estradiol", 30.0, 400.0, "pg/mL"),
            ("FSH", 4.0, 13.0, "mUI/mL"),
            ("LH", 1.0, 18.0, "mUI/mL"),
            ("Progesterona", 0.3, 1.5, "ng/mL"),
        ]),
    );

    let mut checkup_profiles = BTreeMap::new();
    checkup_profiles.insert(
        "SAÚDE DO HOMEM".to_string(),
        vec![
            "HEMOGRAMA".to_string(),
            "GLICEMIA".to_string(),
            "PERFIL LIPÍDICO".to_string(),
            "FUNÇÃO RENAL".to_string(),
            "FUNÇÃO TIREOIDEANA".to_string(),
            "PSA".to_string(),
        ],
    );
    checkup_profiles.insert(
        "SAÚDE DA MULHER".to_string(),
        vec![
            "HEMOGRAMA".to_string(),
            "GLICEMIA".to_string(),
            "FUNÇÃO RENAL".to_string(),
            "PERFIL LIPÍDICO".to_string(),
            "FUNÇÃO TIREOIDEANA".to_string(),
            "HORMÔNIOS FEMININOS".to_string(),
        ],
    );
    checkup_profiles.insert(
        "ROTINA".to_string(),
        vec![
            "HEMOGRAMA".to_string(),
            "GLICEMIA".to_string(),
            "FUNÇÃO RENAL".to_string(),
            "PERFIL LIPÍDICO".to_string(),
        ],
    );

    let mut descriptions = BTreeMap::new();
    descriptions.insert(
        "SAÚDE DO HOMEM".to_string(),
        "Checkup voltado à saúde masculina".to_string(),
    );
    descriptions.insert(
        "SAÚDE DA MULHER".to_string(),
        "Checkup voltado à saúde feminina".to_string(),
    );
    descriptions.insert(
        "ROTINA".to_string(),
        "Checkup de rotina básico".to_string(),
    );

    ReferenceCatalog {
        ranges,
        checkup_profiles,
        descriptions,
    }
}
