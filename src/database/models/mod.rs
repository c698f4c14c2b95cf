pub mod actor;
pub mod movie;

pub use actor::{Actor, ActorFields};
pub use movie::{Movie, MovieFields};

use serde::{Deserialize, Deserializer};

// Text columns are VARCHAR(MAX); the limit counts characters, as Postgres does
pub(crate) fn bounded_text<'de, D, const MAX: usize>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    match text {
        Some(text) if text.chars().count() > MAX => Err(serde::de::Error::custom(format!(
            "value exceeds {} characters",
            MAX
        ))),
        text => Ok(text),
    }
}
