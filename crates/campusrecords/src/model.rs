//! Core record types for campusrecords.
//!
//! This module defines the student and course records held by the data
//! store, the partial-record inputs accepted by its mutations, and the
//! loose key comparison used for every lookup.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A record key that may arrive as an integer or as text.
///
/// Keys from JSON documents are usually numbers, while keys from URLs and
/// form posts are strings. Two keys compare equal under [`RecordKey::loose_eq`]
/// when they denote the same value:
///
/// - integer vs integer compares numerically
/// - integer vs text converts the text to a number first
/// - text vs text compares the strings exactly
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKey {
    /// A numeric key.
    Int(i64),
    /// A textual key.
    Text(String),
}

impl Default for RecordKey {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl RecordKey {
    /// Compare two keys under loose equality.
    #[must_use]
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Int(n), Self::Text(s)) | (Self::Text(s), Self::Int(n)) => {
                text_to_number(s).is_some_and(|v| int_eq_float(*n, v))
            }
        }
    }

    /// Numeric value of this key, if it has one.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Text(s) => text_to_number(s),
        }
    }

    /// Compare this key against an integer record field.
    #[must_use]
    pub fn matches_int(&self, value: i64) -> bool {
        self.loose_eq(&Self::Int(value))
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for RecordKey {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for RecordKey {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Numeric value of a text key; blank text counts as zero.
fn text_to_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
fn int_eq_float(n: i64, v: f64) -> bool {
    v.fract() == 0.0 && (n as f64) == v
}

/// General truthiness used when adding a student.
///
/// `false`, `null`, zero and the empty string are false; every other value
/// (including arrays and objects) is true.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Checkbox convention used when updating a student: only the literal
/// string `"on"` is true.
#[must_use]
pub fn is_checked(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if s == "on")
}

/// A student record as stored in the student document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Student {
    /// Store-assigned number, `count_at_insertion + 1`.
    #[serde(deserialize_with = "deserialize_student_num")]
    pub student_num: u32,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Street address.
    pub address_street: String,
    /// City.
    pub address_city: String,
    /// Province or state.
    pub address_province: String,
    /// Whether the student is a teaching assistant.
    #[serde(rename = "TA")]
    pub ta: bool,
    /// The `courseId` of the course this student is enrolled in.
    pub course: RecordKey,
    /// Keys not modelled above (e.g. `status`), kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Student {
    /// Document keys owned by the typed fields.
    pub const FIELDS: [&'static str; 9] = [
        "studentNum",
        "firstName",
        "lastName",
        "email",
        "addressStreet",
        "addressCity",
        "addressProvince",
        "TA",
        "course",
    ];

    /// Check whether this student is enrolled in the given course.
    #[must_use]
    pub fn is_enrolled_in(&self, course_id: &RecordKey) -> bool {
        self.course.loose_eq(course_id)
    }

    /// Check whether this student is enrolled in `course`.
    #[must_use]
    pub fn takes_course(&self, course: &Course) -> bool {
        self.is_enrolled_in(&course.key())
    }

    /// Read an extra key as display text, or an empty string.
    #[must_use]
    pub fn extra_text(&self, key: &str) -> String {
        text_of(&self.extra, key)
    }

    /// Full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Accept `studentNum` as a JSON number or a numeric string.
///
/// Older documents written from form posts may carry the number as text.
fn deserialize_student_num<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match RecordKey::deserialize(deserializer)? {
        RecordKey::Int(n) => u32::try_from(n).map_err(D::Error::custom),
        RecordKey::Text(s) => s.trim().parse::<u32>().map_err(D::Error::custom),
    }
}

/// A course record from the course document. Never mutated at runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Course {
    /// Unique course id.
    pub course_id: i64,
    /// Short code, e.g. `WEB700`.
    pub course_code: String,
    /// Human-readable title.
    pub course_name: String,
    /// Descriptive keys (e.g. `courseDescription`), kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    /// The course id as a lookup key.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey::Int(self.course_id)
    }

    /// Read an extra key as display text, or an empty string.
    #[must_use]
    pub fn extra_text(&self, key: &str) -> String {
        text_of(&self.extra, key)
    }
}

/// A partial student record supplied by a caller.
///
/// Every field is optional. Keys outside the modelled set land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentFields {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New street address.
    pub address_street: Option<String>,
    /// New city.
    pub address_city: Option<String>,
    /// New province.
    pub address_province: Option<String>,
    /// New course enrollment.
    pub course: Option<RecordKey>,
    /// Raw teaching-assistant flag; normalized differently by add and update.
    #[serde(rename = "TA")]
    pub ta: Option<Value>,
    /// Any other supplied keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StudentFields {
    /// Build a new student record numbered `student_num`.
    ///
    /// `TA` follows general truthiness; missing fields are left empty.
    #[must_use]
    pub fn into_student(self, student_num: u32) -> Student {
        let ta = self.ta.as_ref().is_some_and(is_truthy);
        Student {
            student_num,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            address_street: self.address_street.unwrap_or_default(),
            address_city: self.address_city.unwrap_or_default(),
            address_province: self.address_province.unwrap_or_default(),
            ta,
            course: self.course.unwrap_or_default(),
            extra: without_reserved(self.extra),
        }
    }

    /// Shallow-merge these fields over an existing record.
    ///
    /// Supplied fields overwrite, absent ones are kept. `TA` is true only
    /// for the literal `"on"`, and is reset to false when absent.
    pub fn merge_into(self, student: &mut Student) {
        student.ta = is_checked(self.ta.as_ref());
        if let Some(v) = self.first_name {
            student.first_name = v;
        }
        if let Some(v) = self.last_name {
            student.last_name = v;
        }
        if let Some(v) = self.email {
            student.email = v;
        }
        if let Some(v) = self.address_street {
            student.address_street = v;
        }
        if let Some(v) = self.address_city {
            student.address_city = v;
        }
        if let Some(v) = self.address_province {
            student.address_province = v;
        }
        if let Some(v) = self.course {
            student.course = v;
        }
        student.extra.extend(without_reserved(self.extra));
    }
}

/// An update request: the key of the student to change plus new fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdate {
    /// Number of the student to update.
    pub student_num: RecordKey,
    /// Fields to merge over the stored record.
    #[serde(flatten)]
    pub fields: StudentFields,
}

fn text_of(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn without_reserved(mut extra: Map<String, Value>) -> Map<String, Value> {
    for key in Student::FIELDS {
        extra.remove(key);
    }
    extra
}
