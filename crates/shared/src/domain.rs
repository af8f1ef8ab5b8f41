use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SyncError;

/// Measurement unit of a shopping list line item.
///
/// `None` is the unit used when no unit string is supplied; on the wire it
/// appears as an empty string (the legacy spellings `" "` and `"none"` are
/// accepted on input and collapse to it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    G,
    Kg,
    Ml,
    L,
    None,
}

impl Unit {
    /// Minimum decrement step applied by a reduce-quantity event.
    pub fn min_step(self) -> f64 {
        match self {
            Unit::G => 100.0,
            Unit::Kg => 1.0,
            Unit::Ml => 100.0,
            Unit::L => 1.0,
            Unit::None => 1.0,
        }
    }

    /// Canonical wire token. Empty string for [`Unit::None`].
    pub fn token(self) -> &'static str {
        match self {
            Unit::G => "g",
            Unit::Kg => "kg",
            Unit::Ml => "ml",
            Unit::L => "l",
            Unit::None => "",
        }
    }

    /// Parses a unit token, normalizing the absent-unit spellings.
    ///
    /// Any token outside the fixed table is a hard [`SyncError::UnknownUnit`];
    /// there is no fallback step for unrecognized units.
    pub fn parse(token: &str) -> Result<Self, SyncError> {
        match token {
            "g" => Ok(Unit::G),
            "kg" => Ok(Unit::Kg),
            "ml" => Ok(Unit::Ml),
            "l" => Ok(Unit::L),
            "" | " " | "none" => Ok(Unit::None),
            other => Err(SyncError::UnknownUnit(other.to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Unit::parse(&token).map_err(de::Error::custom)
    }
}

/// Registry key of a line item. At most one product exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    pub name: String,
    pub unit: Unit,
}

impl ProductKey {
    pub fn new(name: impl Into<String>, unit: Unit) -> Self {
        Self {
            name: name.into(),
            unit,
        }
    }
}

// Name first so ordered-map iteration is ascending lexicographic by name;
// the unit only breaks ties between same-named items.
impl Ord for ProductKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.unit.cmp(&other.unit))
    }
}

impl PartialOrd for ProductKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// One distinct (name, unit) line item of the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub unit: Unit,
    pub quantity: f64,
    pub taken: bool,
}

impl Product {
    pub fn key(&self) -> ProductKey {
        ProductKey::new(self.name.clone(), self.unit)
    }

    /// Display text for the quantity region: `"<quantity> <unit>"`, with the
    /// trailing separator dropped for unit-less items.
    pub fn quantity_label(&self) -> String {
        quantity_label(self.quantity, self.unit)
    }
}

pub fn quantity_label(quantity: f64, unit: Unit) -> String {
    match unit {
        Unit::None => format!("{quantity}"),
        unit => format!("{quantity} {unit}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_unit_spellings_collapse_to_none() {
        for token in ["", " ", "none"] {
            assert_eq!(Unit::parse(token).unwrap(), Unit::None);
        }
    }

    #[test]
    fn unrecognized_unit_is_a_hard_error() {
        match Unit::parse("oz") {
            Err(SyncError::UnknownUnit(token)) => assert_eq!(token, "oz"),
            other => panic!("expected UnknownUnit, got {other:?}"),
        }
    }

    #[test]
    fn min_step_table_matches_unit_model() {
        assert_eq!(Unit::G.min_step(), 100.0);
        assert_eq!(Unit::Kg.min_step(), 1.0);
        assert_eq!(Unit::Ml.min_step(), 100.0);
        assert_eq!(Unit::L.min_step(), 1.0);
        assert_eq!(Unit::None.min_step(), 1.0);
    }

    #[test]
    fn keys_order_by_name_before_unit() {
        let apple = ProductKey::new("Apple", Unit::None);
        let banana_g = ProductKey::new("Banana", Unit::G);
        let banana_kg = ProductKey::new("Banana", Unit::Kg);
        assert!(apple < banana_g);
        assert!(banana_g < banana_kg);
    }

    #[test]
    fn quantity_label_hides_the_none_unit() {
        assert_eq!(quantity_label(2.0, Unit::Kg), "2 kg");
        assert_eq!(quantity_label(12.0, Unit::None), "12");
    }
}
