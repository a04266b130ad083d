//! Test utilities for Strata

use crate::model::FileRecord;

/// Records from `(path, targets)` pairs.
pub fn records(entries: &[(&str, &[&str])]) -> Vec<FileRecord> {
    entries
        .iter()
        .map(|(path, targets)| FileRecord::new(*path, targets))
        .collect()
}

/// Same records in a different enumeration order, with each record's
/// targets reversed as well.
pub fn reordered(records: &[FileRecord]) -> Vec<FileRecord> {
    let mut shuffled: Vec<FileRecord> = records
        .iter()
        .rev()
        .map(|record| {
            let mut record = record.clone();
            record.dependency_targets.reverse();
            record
        })
        .collect();
    if shuffled.len() > 2 {
        shuffled.rotate_left(1);
    }
    shuffled
}

/// A layered project with one cross-folder cycle and a virtual folder.
pub fn sample_project() -> Vec<FileRecord> {
    let mut records = records(&[
        ("lib/main.dart", &["lib/app/app.dart"]),
        ("lib/app/app.dart", &["lib/screens/home.dart", "lib/screens/login/entry.dart"]),
        ("lib/screens/home.dart", &["lib/models/user.dart", "lib/services/api.dart"]),
        ("lib/screens/login/entry.dart", &["lib/models/user.dart", "lib/services/auth.dart"]),
        ("lib/services/api.dart", &["lib/models/user.dart"]),
        ("lib/services/auth.dart", &["lib/services/api.dart", "lib/models/session.dart"]),
        ("lib/models/user.dart", &["lib/models/session.dart"]),
        ("lib/models/session.dart", &["lib/services/clock.dart"]),
        ("lib/services/clock.dart", &[]),
    ]);
    records[0].is_entry_point = true;
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reordered_keeps_every_record() {
        let original = sample_project();
        let shuffled = reordered(&original);
        assert_eq!(original.len(), shuffled.len());
        assert_ne!(original, shuffled);
        for record in &original {
            assert!(shuffled.iter().any(|r| r.file_path == record.file_path));
        }
    }
}
