//! How hard a practised category felt, rated once per session.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, time::DayStamp};

/// A difficulty from 1 (easy) to 3 (hard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 3;

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<u8> for Difficulty {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    if (Self::MIN..=Self::MAX).contains(&value) {
      Ok(Self(value))
    } else {
      Err(Error::InvalidDifficulty(value))
    }
  }
}

impl From<Difficulty> for u8 {
  fn from(d: Difficulty) -> Self { d.0 }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRating {
  pub rating_id:  Uuid,
  pub profile_id: Uuid,
  /// The rated session; unique across ratings.
  pub session_id: Uuid,
  pub category:   String,
  pub date:       DayStamp,
  pub difficulty: Difficulty,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn difficulty_bounds() {
    assert!(Difficulty::try_from(0).is_err());
    assert_eq!(Difficulty::try_from(1).unwrap().get(), 1);
    assert_eq!(Difficulty::try_from(3).unwrap().get(), 3);
    assert!(matches!(Difficulty::try_from(4), Err(Error::InvalidDifficulty(4))));
  }

  #[test]
  fn difficulty_deserialisation_is_validated() {
    let ok: Difficulty = serde_json::from_str("2").unwrap();
    assert_eq!(ok.get(), 2);
    assert!(serde_json::from_str::<Difficulty>("7").is_err());
  }
}
