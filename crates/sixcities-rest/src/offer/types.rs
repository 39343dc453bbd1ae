//! Offer enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six cities offers can be listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    /// Paris.
    Paris,
    /// Cologne.
    Cologne,
    /// Brussels.
    Brussels,
    /// Amsterdam.
    Amsterdam,
    /// Hamburg.
    Hamburg,
    /// Dusseldorf.
    Dusseldorf,
}

impl City {
    /// Every city, in display order.
    pub const ALL: [Self; 6] = [
        Self::Paris,
        Self::Cologne,
        Self::Brussels,
        Self::Amsterdam,
        Self::Hamburg,
        Self::Dusseldorf,
    ];

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paris => "Paris",
            Self::Cologne => "Cologne",
            Self::Brussels => "Brussels",
            Self::Amsterdam => "Amsterdam",
            Self::Hamburg => "Hamburg",
            Self::Dusseldorf => "Dusseldorf",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown city name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCity(pub String);

impl fmt::Display for UnknownCity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown city \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownCity {}

impl FromStr for City {
    type Err = UnknownCity;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|city| city.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCity(s.to_string()))
    }
}

/// Kind of housing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HousingType {
    /// Whole apartment.
    Apartment,
    /// Whole house.
    House,
    /// Private room.
    Room,
    /// Hotel room.
    Hotel,
}

/// Amenities an offer can list. Serialized by display name.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Amenity {
    #[serde(rename = "Breakfast")]
    Breakfast,
    #[serde(rename = "Air conditioning")]
    AirConditioning,
    #[serde(rename = "Laptop friendly workspace")]
    LaptopFriendlyWorkspace,
    #[serde(rename = "Baby seat")]
    BabySeat,
    #[serde(rename = "Washer")]
    Washer,
    #[serde(rename = "Towels")]
    Towels,
    #[serde(rename = "Fridge")]
    Fridge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_parse_ignores_case() {
        assert_eq!("amsterdam".parse::<City>(), Ok(City::Amsterdam));
        assert_eq!("Paris".parse::<City>(), Ok(City::Paris));
        assert_eq!(
            "Berlin".parse::<City>().unwrap_err().to_string(),
            "Unknown city \"Berlin\""
        );
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&City::Dusseldorf).unwrap(), r#""Dusseldorf""#);
        assert_eq!(serde_json::to_string(&HousingType::Hotel).unwrap(), r#""hotel""#);
        assert_eq!(
            serde_json::to_string(&Amenity::AirConditioning).unwrap(),
            r#""Air conditioning""#
        );
    }
}
