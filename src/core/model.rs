//! The educational toy record and its validation rules

use crate::core::validation::{Validator, unique};
use chrono::{DateTime, Datelike, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Earliest year a record may carry.
pub const MIN_YEAR: i32 = 1888;

/// Maximum title length, in bytes.
pub const MAX_TITLE_BYTES: usize = 500;

/// Maximum number of genres per record.
pub const MAX_GENRES: usize = 5;

/// Play time in minutes.
///
/// On the wire a runtime is the string `"<n> mins"`. Deserialization also
/// accepts a bare integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Runtime(pub i32);

impl Runtime {
    pub fn minutes(self) -> i32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for Runtime {
    fn from(minutes: i32) -> Self {
        Runtime(minutes)
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mins", self.0)
    }
}

impl Serialize for Runtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct RuntimeVisitor;

impl Visitor<'_> for RuntimeVisitor {
    type Value = Runtime;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a runtime such as \"102 mins\" or an integer number of minutes")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Runtime, E> {
        i32::try_from(v)
            .map(Runtime)
            .map_err(|_| E::custom("invalid runtime format"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Runtime, E> {
        i32::try_from(v)
            .map(Runtime)
            .map_err(|_| E::custom("invalid runtime format"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Runtime, E> {
        let minutes = v
            .strip_suffix(" mins")
            .and_then(|n| n.parse::<i32>().ok())
            .ok_or_else(|| E::custom("invalid runtime format"))?;
        Ok(Runtime(minutes))
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RuntimeVisitor)
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// An educational toy record.
///
/// `id`, `created_at` and `version` are owned by the store: callers leave
/// them at their defaults on insert and round-trip `version` on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Edtoy {
    pub id: i64,

    #[serde(skip)]
    pub created_at: DateTime<Utc>,

    pub title: String,

    #[serde(skip_serializing_if = "is_zero")]
    pub year: i32,

    pub target_age: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,

    pub skill_focus: Vec<String>,

    #[serde(skip_serializing_if = "Runtime::is_zero")]
    pub runtime: Runtime,

    pub version: i32,
}

/// Check every rule a persisted record must satisfy.
pub fn validate_edtoy(v: &mut Validator, edtoy: &Edtoy) {
    validate_edtoy_in_year(v, edtoy, Utc::now().year());
}

/// [`validate_edtoy`] against a fixed calendar year.
pub fn validate_edtoy_in_year(v: &mut Validator, edtoy: &Edtoy, current_year: i32) {
    v.check(!edtoy.title.is_empty(), "title", "must be provided");
    v.check(
        edtoy.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(edtoy.year != 0, "year", "must be provided");
    v.check(edtoy.year >= MIN_YEAR, "year", "must be greater than 1888");
    v.check(edtoy.year <= current_year, "year", "must not be in the future");

    v.check(!edtoy.runtime.is_zero(), "runtime", "must be provided");
    v.check(edtoy.runtime.0 > 0, "runtime", "must be a positive integer");

    v.check(
        !edtoy.genres.is_empty(),
        "genres",
        "must contain at least 1 genre",
    );
    v.check(
        edtoy.genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(
        unique(&edtoy.genres),
        "genres",
        "must not contain duplicate values",
    );
}
