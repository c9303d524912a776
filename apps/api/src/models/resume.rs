use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::resume::dates::deserialize_optional_date;

/// Resume payload posted by the form. Deserialized once per request and never
/// mutated afterwards.
///
/// String fields default to `""` when absent so that missing required fields
/// surface as a validation error listing every gap, not a serde error naming
/// only the first one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub sections: Sections,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// Optional resume sections keyed by their display name. `None` (key absent
/// or `null`) omits the section entirely; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sections {
    #[serde(rename = "EDUCATION", default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(
        rename = "WORK EXPERIENCE",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub work_experience: Option<Vec<WorkEntry>>,
    #[serde(
        rename = "HONORS AND AWARDS",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub honors_and_awards: Option<Vec<HonorEntry>>,
    #[serde(rename = "SKILLS", default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub gpa: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub from_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub institution: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub from_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HonorEntry {
    #[serde(default)]
    pub title: String,
    /// Free text, rendered verbatim (e.g. "2019, 2021").
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

impl HonorEntry {
    /// True when any field carries text. Blank entries are left out of the
    /// rendered document, and a section of only blank entries is dropped.
    pub fn has_content(&self) -> bool {
        !self.title.is_empty()
            || !self.dates.is_empty()
            || !self.institution.is_empty()
            || self.achievements.iter().any(|a| !a.is_empty())
    }

    /// Achievements with empty strings removed, order preserved.
    pub fn listed_achievements(&self) -> Vec<&str> {
        self.achievements
            .iter()
            .map(String::as_str)
            .filter(|a| !a.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_record() {
        let record: ResumeRecord = serde_json::from_value(json!({
            "name": "Ada Lovelace",
            "contact": { "address": "London", "phone": "555-0100", "email": "ada@example.com" },
            "sections": {
                "EDUCATION": [{
                    "degree": "BSc Mathematics",
                    "gpa": "3.9",
                    "fromDate": "2015-09-01T00:00:00.000Z",
                    "toDate": "2019-06-01T00:00:00.000Z",
                    "institution": "University of London"
                }],
                "WORK EXPERIENCE": [{
                    "title": "Analyst",
                    "fromDate": "2020-01-15",
                    "location": "London",
                    "responsibilities": ["Wrote programs", ""]
                }],
                "HONORS AND AWARDS": [{
                    "title": "Medal",
                    "dates": "2021",
                    "institution": "Royal Society",
                    "achievements": ["First"]
                }],
                "SKILLS": ["Go", "Rust"]
            }
        }))
        .unwrap();

        let education = record.sections.education.as_ref().unwrap();
        assert_eq!(education[0].from_date, NaiveDate::from_ymd_opt(2015, 9, 1));
        assert_eq!(education[0].to_date, NaiveDate::from_ymd_opt(2019, 6, 1));

        let work = record.sections.work_experience.as_ref().unwrap();
        assert_eq!(work[0].from_date, NaiveDate::from_ymd_opt(2020, 1, 15));
        assert_eq!(work[0].to_date, None);
        assert_eq!(work[0].responsibilities, vec!["Wrote programs", ""]);

        assert_eq!(record.sections.skills, Some(vec!["Go".into(), "Rust".into()]));
    }

    #[test]
    fn test_missing_and_null_sections_are_none() {
        let record: ResumeRecord = serde_json::from_value(json!({
            "name": "A",
            "contact": { "address": "x", "phone": "y", "email": "z" },
            "sections": { "SKILLS": null, "PROJECTS": ["ignored"] }
        }))
        .unwrap();
        assert_eq!(record.sections, Sections::default());
    }

    #[test]
    fn test_missing_strings_default_to_empty() {
        let record: ResumeRecord = serde_json::from_value(json!({})).unwrap();
        assert!(record.name.is_empty());
        assert!(record.contact.email.is_empty());
    }

    #[test]
    fn test_null_and_empty_dates_are_unset() {
        let entry: WorkEntry = serde_json::from_value(json!({
            "title": "Dev",
            "fromDate": null,
            "toDate": ""
        }))
        .unwrap();
        assert_eq!(entry.from_date, None);
        assert_eq!(entry.to_date, None);
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let result = serde_json::from_value::<EducationEntry>(json!({ "fromDate": "last spring" }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("last spring"));
    }

    #[test]
    fn test_honor_has_content() {
        let blank = HonorEntry {
            achievements: vec![String::new(), String::new()],
            ..Default::default()
        };
        assert!(!blank.has_content());

        let only_achievement = HonorEntry {
            achievements: vec![String::new(), "Won".to_string()],
            ..Default::default()
        };
        assert!(only_achievement.has_content());

        let only_dates = HonorEntry {
            dates: "2020".to_string(),
            ..Default::default()
        };
        assert!(only_dates.has_content());
    }

    #[test]
    fn test_listed_achievements_drop_empties_in_order() {
        let honor = HonorEntry {
            achievements: vec!["a".into(), "".into(), "b".into()],
            ..Default::default()
        };
        assert_eq!(honor.listed_achievements(), vec!["a", "b"]);
    }
}
