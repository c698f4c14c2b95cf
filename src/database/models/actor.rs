use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use super::bounded_text;
use crate::database::store::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Actor {
    pub id: i64,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

/// Writable actor columns as they arrive in a request body.
/// `null` and absent are both `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActorFields {
    #[serde(default, deserialize_with = "bounded_text::<_, 120>")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "integer_or_numeric_string")]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "bounded_text::<_, 20>")]
    pub gender: Option<String>,
}

impl ActorFields {
    /// Keys of which at least one must be present when creating an actor
    pub const CREATE_KEYS: &'static [&'static str] = &["name", "age", "gender"];
}

impl Actor {
    /// Overwrite every field supplied in `fields`, leaving the rest untouched
    pub fn apply(&mut self, fields: ActorFields) {
        if let Some(name) = fields.name {
            self.name = Some(name);
        }
        if let Some(age) = fields.age {
            self.age = Some(age);
        }
        if let Some(gender) = fields.gender {
            self.gender = Some(gender);
        }
    }
}

impl Record for Actor {
    type Fields = ActorFields;
    const TABLE: &'static str = "actors";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_fields(id: i64, fields: ActorFields) -> Self {
        Self {
            id,
            name: fields.name,
            age: fields.age,
            gender: fields.gender,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntegerOrString {
    Integer(i32),
    String(String),
}

// The age column accepts textual integers such as "39"
fn integer_or_numeric_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntegerOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntegerOrString::Integer(value)) => Ok(Some(value)),
        Some(IntegerOrString::String(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("age is not an integer: {:?}", text))),
    }
}
