use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::bounded_text;
use crate::database::store::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: Option<String>,
    /// Release date as supplied by the client, e.g. `2021-10-22`
    pub release: Option<String>,
}

/// Writable movie columns as they arrive in a request body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieFields {
    #[serde(default, deserialize_with = "bounded_text::<_, 120>")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "bounded_text::<_, 120>")]
    pub release: Option<String>,
}

impl MovieFields {
    /// Keys that must all be present when creating a movie
    pub const CREATE_KEYS: &'static [&'static str] = &["title", "release"];
}

impl Movie {
    pub fn apply(&mut self, fields: MovieFields) {
        if let Some(title) = fields.title {
            self.title = Some(title);
        }
        if let Some(release) = fields.release {
            self.release = Some(release);
        }
    }
}

impl Record for Movie {
    type Fields = MovieFields;
    const TABLE: &'static str = "movies";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_fields(id: i64, fields: MovieFields) -> Self {
        Self {
            id,
            title: fields.title,
            release: fields.release,
        }
    }
}
