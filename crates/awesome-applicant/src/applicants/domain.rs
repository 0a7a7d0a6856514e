use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

/// Store-assigned primary key of an applicant row.
pub type ApplicantId = i32;

/// Persisted applicant row. `id` is always present once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Applicant {
    pub id: ApplicantId,
    pub name: String,
    pub email: String,
    pub profile: String,
}

/// Body of create and replace requests.
///
/// Fields are not checked for presence here: an absent field is bound as `NULL` and the
/// table's `NOT NULL` constraints decide whether the statement succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
}

impl ApplicantDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            profile: Some(profile.into()),
        }
    }

    /// Reads a request body without rejecting anything.
    ///
    /// A body that is empty, not JSON, or not a JSON object reads as `{}`. Absent and `null`
    /// fields become `None`; numbers and booleans are bound as their text, the same way the
    /// column would receive them as text parameters.
    pub fn from_body(body: &[u8]) -> Self {
        let fields = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => fields,
            _ => Map::new(),
        };

        Self {
            name: text_field(&fields, "name"),
            email: text_field(&fields, "email"),
            profile: text_field(&fields, "profile"),
        }
    }

    /// Name of the first field that would violate a `NOT NULL` column.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.is_none() {
            Some("name")
        } else if self.email.is_none() {
            Some("email")
        } else if self.profile.is_none() {
            Some("profile")
        } else {
            None
        }
    }

    /// Builds the row the store would persist, or `None` while a field is missing.
    pub fn into_applicant(self, id: ApplicantId) -> Option<Applicant> {
        Some(Applicant {
            id,
            name: self.name?,
            email: self.email?,
            profile: self.profile?,
        })
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(as_text)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        // Arrays go out as a Postgres array literal, objects as their JSON text.
        Value::Array(items) => {
            let elements: Vec<String> = items
                .iter()
                .map(|item| match as_text(item) {
                    None => "NULL".to_string(),
                    Some(text) => {
                        format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
                    }
                })
                .collect();
            Some(format!("{{{}}}", elements.join(",")))
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Parses a path segment with the leniency clients of this API rely on: surrounding
/// whitespace and a sign are accepted, and parsing stops at the first non-digit, so
/// `"12abc"` addresses applicant 12. Yields `None` when no digits lead the segment or the
/// value does not fit the id column.
pub fn parse_applicant_id(raw: &str) -> Option<ApplicantId> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }

    let magnitude: i64 = digits.parse().ok()?;
    let value = if negative { -magnitude } else { magnitude };
    ApplicantId::try_from(value).ok()
}
