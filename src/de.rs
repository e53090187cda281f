//! Lenient deserializers for values whose wire shape varies by endpoint

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Price {
    Number(f64),
    Text(String),
}

impl Price {
    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            Price::Number(n) => Ok(n),
            Price::Text(s) => s.trim().parse().map_err(E::custom),
        }
    }
}

/// A JSON number or a numeric string; Postgres numerics arrive as strings
pub(crate) fn de_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Price::deserialize(deserializer)?.into_f64()
}

/// Like [`de_price`], with `null` and `""` read as absent
pub(crate) fn de_opt_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Price>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Price::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(price) => price.into_f64().map(Some),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Services {
    List(Vec<String>),
    Encoded(String),
}

/// A string array, or a string holding a JSON-encoded string array
pub(crate) fn de_services<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Services>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Services::List(list)) => Ok(list),
        Some(Services::Encoded(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(Services::Encoded(s)) => serde_json::from_str(&s).map_err(de::Error::custom),
    }
}
