//! Student DTOs for add, batch add, import, status, score and profile
//! updates.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::present_field;
use crate::domain::{NewStudent, Student};
use crate::error::RosterError;

/// Request body for `POST /students` and one element of a batch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    /// Display name. Not validated on single add.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional external identifier.
    #[serde(default)]
    pub student_id: Option<String>,
}

impl From<CreateStudentRequest> for NewStudent {
    fn from(req: CreateStudentRequest) -> Self {
        Self::new(req.name.unwrap_or_default(), req.student_id)
    }
}

/// Request body for `POST /students/batch`.
///
/// Either `students` (full objects) or `names` (bare strings) is accepted.
/// A `students` key wins whenever it is present, even as `null`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BatchAddRequest {
    /// Students with optional external ids.
    #[serde(default, deserialize_with = "present_field")]
    #[schema(value_type = Option<Vec<CreateStudentRequest>>)]
    pub students: Option<Option<Vec<CreateStudentRequest>>>,
    /// Bare names; `null` entries are dropped like blank ones.
    #[serde(default)]
    pub names: Option<Vec<Option<String>>>,
}

impl BatchAddRequest {
    /// Flattens either input shape into insert payloads. Blank names are
    /// kept here; the service filters them.
    #[must_use]
    pub fn into_candidates(self) -> Vec<NewStudent> {
        match (self.students, self.names) {
            (Some(students), _) => students
                .unwrap_or_default()
                .into_iter()
                .map(NewStudent::from)
                .collect(),
            (None, Some(names)) => names
                .into_iter()
                .map(|name| NewStudent::new(name.unwrap_or_default(), None))
                .collect(),
            (None, None) => Vec::new(),
        }
    }
}

/// Response body for `POST /students/batch`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchAddResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Number of students actually written.
    pub added: u64,
}

/// Roster file format accepted by `POST /students/import`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportFormat {
    /// `data` is a JSON array of student objects.
    #[default]
    Json,
    /// `data` is CSV text with a header row.
    Csv,
}

impl FromStr for ImportFormat {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else if s.eq_ignore_ascii_case("csv") {
            Ok(Self::Csv)
        } else {
            Err(RosterError::InvalidRequest(format!(
                "unsupported import format {s:?}, use \"json\" or \"csv\""
            )))
        }
    }
}

/// Request body for `POST /students/import`.
///
/// CSV data needs a header row naming a `name` column and optionally a
/// `student_id` (or `student_number`) column; other columns are ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportStudentsRequest {
    /// `"json"` (default) or `"csv"`.
    #[serde(default)]
    pub format: Option<String>,
    /// A JSON array of students, or CSV text.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: Option<serde_json::Value>,
}

/// One CSV row of a roster import.
#[derive(Debug, Deserialize)]
struct CsvStudentRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "student_number")]
    student_id: Option<String>,
}

impl ImportStudentsRequest {
    /// Parses the payload into trimmed insert payloads, dropping rows whose
    /// name is blank.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidRequest`] when `data` is missing, the
    /// format is unsupported, or the payload does not parse in that format.
    pub fn into_candidates(self) -> Result<Vec<NewStudent>, RosterError> {
        let format = match self.format.as_deref() {
            Some(format) => format.parse()?,
            None => ImportFormat::default(),
        };
        let Some(data) = self.data.filter(|d| !d.is_null()) else {
            return Err(RosterError::InvalidRequest(
                "missing data payload for import".to_string(),
            ));
        };

        let parsed = match format {
            ImportFormat::Csv => {
                let serde_json::Value::String(text) = data else {
                    return Err(RosterError::InvalidRequest(
                        "CSV data must be a string".to_string(),
                    ));
                };
                parse_csv(&text)?
            }
            ImportFormat::Json => serde_json::from_value::<Vec<CreateStudentRequest>>(data)
                .map_err(|_| {
                    RosterError::InvalidRequest(
                        "JSON data must be an array of students".to_string(),
                    )
                })?
                .into_iter()
                .map(NewStudent::from)
                .collect(),
        };
        Ok(parsed.into_iter().filter_map(trimmed).collect())
    }
}

fn parse_csv(text: &str) -> Result<Vec<NewStudent>, RosterError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut students = Vec::new();
    for row in reader.deserialize::<CsvStudentRow>() {
        let row = row.map_err(|e| RosterError::InvalidRequest(format!("malformed CSV: {e}")))?;
        students.push(NewStudent::new(row.name.unwrap_or_default(), row.student_id));
    }
    Ok(students)
}

/// Trims both fields; `None` when the name is blank.
fn trimmed(student: NewStudent) -> Option<NewStudent> {
    let name = student.name.trim();
    if name.is_empty() {
        return None;
    }
    let student_id = student
        .student_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    Some(NewStudent::new(name, student_id))
}

/// Request body for `PUT /students/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// New status, e.g. `"present"` or `"absent"`. Any string is accepted.
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for `PUT /students/{id}/score`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateScoreRequest {
    /// Amount added to the current score. Defaults to 0.
    #[serde(default)]
    pub delta: Option<i64>,
}

/// Request body for `PUT /students/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStudentRequest {
    /// New display name; blank keeps the current one.
    #[serde(default)]
    pub name: Option<String>,
    /// New external identifier; blank keeps the current one.
    #[serde(default)]
    pub student_id: Option<String>,
}

/// A student as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    /// System-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Optional external identifier.
    pub student_id: Option<String>,
    /// Cumulative score.
    pub score: i64,
    /// Times drawn by a spin.
    pub selection_count: i64,
    /// Presence status; `null` counts as present.
    pub status: Option<String>,
}

impl From<Student> for StudentResponse {
    fn from(s: Student) -> Self {
        Self {
            id: s.id,
            name: s.name,
            student_id: s.student_id,
            score: s.score,
            selection_count: s.selection_count,
            status: s.status,
        }
    }
}
