// Field catalog
// Maps the labels shown on the form to the dataset keys the query grammar uses

use super::Dataset;
use crate::error::QueryError;

/// Label/key pairs for the courses dataset
const COURSES_FIELDS: &[(&str, &str)] = &[
    ("Audit", "audit"),
    ("Average", "avg"),
    ("Department", "dept"),
    ("Fail", "fail"),
    ("ID", "id"),
    ("Instructor", "instructor"),
    ("Pass", "pass"),
    ("Title", "title"),
    ("UUID", "uuid"),
    ("Year", "year"),
];

/// Label/key pairs for the rooms dataset
const ROOMS_FIELDS: &[(&str, &str)] = &[
    ("Address", "address"),
    ("Full Name", "fullname"),
    ("Furniture", "furniture"),
    ("Link", "href"),
    ("Latitude", "lat"),
    ("Longitude", "lon"),
    ("Name", "name"),
    ("Seats", "seats"),
    ("Short Name", "shortname"),
    ("Number", "number"),
    ("Type", "type"),
];

fn table(dataset: Dataset) -> &'static [(&'static str, &'static str)] {
    match dataset {
        Dataset::Courses => COURSES_FIELDS,
        Dataset::Rooms => ROOMS_FIELDS,
    }
}

/// Prefix a bare key with the dataset name: `avg` -> `courses_avg`
pub fn prefixed(dataset: Dataset, suffix: &str) -> String {
    format!("{}_{}", dataset.name(), suffix)
}

/// Resolve a form label ("Average") to its full dataset key ("courses_avg")
pub fn resolve_label(dataset: Dataset, label: &str) -> Result<String, QueryError> {
    table(dataset)
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, key)| prefixed(dataset, key))
        .ok_or_else(|| QueryError::UnknownField {
            dataset: dataset.name().to_string(),
            label: label.to_string(),
            expected: labels(dataset).collect::<Vec<_>>().join(", "),
        })
}

/// The key used when a field select has no option selected
pub fn default_field(dataset: Dataset) -> String {
    // First entry of each catalog: courses_audit / rooms_address
    prefixed(dataset, table(dataset)[0].1)
}

/// All labels of a dataset, in catalog order
pub fn labels(dataset: Dataset) -> impl Iterator<Item = &'static str> {
    table(dataset).iter().map(|(label, _)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_labels() {
        assert_eq!(resolve_label(Dataset::Courses, "Average").unwrap(), "courses_avg");
        assert_eq!(resolve_label(Dataset::Rooms, "Link").unwrap(), "rooms_href");
        assert_eq!(resolve_label(Dataset::Rooms, "Short Name").unwrap(), "rooms_shortname");
    }

    #[test]
    fn test_labels_are_dataset_specific() {
        // "Seats" only exists for rooms
        let err = resolve_label(Dataset::Courses, "Seats").unwrap_err();
        assert!(matches!(err, QueryError::UnknownField { .. }));
        let message = err.to_string();
        assert!(message.starts_with("unknown field 'Seats' for dataset 'courses'"));
        assert!(message.contains("(expected one of: Audit, Average, Department,"));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(default_field(Dataset::Courses), "courses_audit");
        assert_eq!(default_field(Dataset::Rooms), "rooms_address");
    }

    #[test]
    fn test_label_listing() {
        assert_eq!(labels(Dataset::Courses).count(), 10);
        assert_eq!(labels(Dataset::Rooms).count(), 11);
        assert!(labels(Dataset::Rooms).any(|l| l == "Full Name"));
    }
}
