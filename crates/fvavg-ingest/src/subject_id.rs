//! Subject-ID extraction (§6): first 2-7 digit run in the file's base
//! name, or empty if none.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

static SUBJECT_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{2,7}\b").unwrap());

pub fn extract_subject_id(file_path: &Path) -> String {
    let stem = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    SUBJECT_ID_RE
        .find(stem)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extracts_first_run_of_two_to_seven_digits() {
        assert_eq!(
            extract_subject_id(&PathBuf::from("patient_12345_run2.xlsx")),
            "12345"
        );
    }

    #[test]
    fn empty_when_no_run_present() {
        assert_eq!(extract_subject_id(&PathBuf::from("abc.xlsx")), "");
    }

    #[test]
    fn single_digit_runs_dont_count() {
        assert_eq!(extract_subject_id(&PathBuf::from("subject_5.xlsx")), "");
    }
}
