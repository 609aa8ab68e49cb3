//! Record model for line-delimited export files.
//!
//! One [`Record`] per line. Older snapshot generations carry `location` as a
//! nested object, newer ones flatten it to the location id; both decode into
//! [`Location`] and compare through [`Location::detail`].

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;

/// One exported entity.
///
/// `id` is required. Every other key may be absent or `null` and then takes
/// its default value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub npi: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ttid: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub middle_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specialties: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: Location,
    #[serde(
        rename = "ranking.position",
        default,
        deserialize_with = "null_as_default"
    )]
    pub position: i64,
}

/// Location as exported: nested detail or a bare location id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Id(i64),
    Detail(LocationDetail),
}

impl Default for Location {
    fn default() -> Self {
        Location::Detail(LocationDetail::default())
    }
}

impl Location {
    /// Comparable view of the location.
    ///
    /// A bare id becomes a detail with that id and empty sub-fields.
    pub fn detail(&self) -> Cow<'_, LocationDetail> {
        match self {
            Location::Detail(detail) => Cow::Borrowed(detail),
            Location::Id(id) => Cow::Owned(LocationDetail {
                id: *id,
                ..LocationDetail::default()
            }),
        }
    }
}

/// Nested location structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationDetail {
    #[serde(rename = "location", default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub affiliation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub zip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub latitude: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub longitude: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

// Coordinates and zip codes show up both quoted and bare across exports.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        Some(TextOrNumber::Text(s)) => s,
        Some(TextOrNumber::Number(n)) => n.to_string(),
        None => String::new(),
    })
}
