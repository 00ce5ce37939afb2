use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use beerstock_core::{BeerId, DomainError, DomainResult, Entity};

/// Beer category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeerType {
    Lager,
    Malzbier,
    Witbier,
    #[serde(alias = "WHEAT")]
    Weiss,
    Ale,
    Ipa,
    Stout,
}

impl BeerType {
    pub const ALL: [BeerType; 7] = [
        BeerType::Lager,
        BeerType::Malzbier,
        BeerType::Witbier,
        BeerType::Weiss,
        BeerType::Ale,
        BeerType::Ipa,
        BeerType::Stout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BeerType::Lager => "LAGER",
            BeerType::Malzbier => "MALZBIER",
            BeerType::Witbier => "WITBIER",
            BeerType::Weiss => "WEISS",
            BeerType::Ale => "ALE",
            BeerType::Ipa => "IPA",
            BeerType::Stout => "STOUT",
        }
    }
}

impl core::fmt::Display for BeerType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Same rule as the serde form: canonical upper-case names plus `WHEAT`,
/// matched case-sensitively.
impl FromStr for BeerType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LAGER" => Ok(BeerType::Lager),
            "MALZBIER" => Ok(BeerType::Malzbier),
            "WITBIER" => Ok(BeerType::Witbier),
            "WEISS" | "WHEAT" => Ok(BeerType::Weiss),
            "ALE" => Ok(BeerType::Ale),
            "IPA" => Ok(BeerType::Ipa),
            "STOUT" => Ok(BeerType::Stout),
            other => Err(DomainError::validation(format!("unknown beer type: {other}"))),
        }
    }
}

/// A beer candidate for registration (every field except the store-assigned id).
///
/// Only constructible through [`NewBeer::new`], so a value of this type always
/// satisfies `max > 0` and `0 <= quantity <= max`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBeer {
    name: String,
    brand: String,
    max: i64,
    quantity: i64,
    beer_type: BeerType,
}

impl NewBeer {
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        max: i64,
        quantity: i64,
        beer_type: BeerType,
    ) -> DomainResult<Self> {
        let name = name.into();
        let brand = brand.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if brand.trim().is_empty() {
            return Err(DomainError::validation("brand cannot be empty"));
        }
        if max <= 0 {
            return Err(DomainError::validation("max must be positive"));
        }
        if quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        if quantity > max {
            return Err(DomainError::validation(format!(
                "quantity {quantity} exceeds max {max}"
            )));
        }

        Ok(Self {
            name,
            brand,
            max,
            quantity,
            beer_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn beer_type(&self) -> BeerType {
        self.beer_type
    }
}

/// Why a quantity transition was rejected.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum StockViolation {
    /// The resulting quantity would be above the capacity ceiling.
    #[error("requested quantity {requested} exceeds max {max}")]
    Exceeded { requested: i128, max: i64 },

    /// The resulting quantity would be negative.
    #[error("requested quantity {requested} is below zero")]
    BelowZero { requested: i128 },
}

/// Persisted beer record.
///
/// Invariant: `0 <= quantity <= max` for every value of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beer {
    id: BeerId,
    name: String,
    brand: String,
    max: i64,
    quantity: i64,
    beer_type: BeerType,
}

impl Beer {
    /// Attach a store-assigned id to a validated candidate.
    pub fn from_new(id: BeerId, new: NewBeer) -> Self {
        Self {
            id,
            name: new.name,
            brand: new.brand,
            max: new.max,
            quantity: new.quantity,
            beer_type: new.beer_type,
        }
    }

    /// Rebuild a record loaded from storage, re-checking the quantity invariant.
    pub fn restore(
        id: BeerId,
        name: String,
        brand: String,
        max: i64,
        quantity: i64,
        beer_type: BeerType,
    ) -> DomainResult<Self> {
        if max <= 0 || quantity < 0 || quantity > max {
            return Err(DomainError::invariant(format!(
                "beer {id} has quantity {quantity} outside [0, {max}]"
            )));
        }
        Ok(Self {
            id,
            name,
            brand,
            max,
            quantity,
            beer_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn beer_type(&self) -> BeerType {
        self.beer_type
    }

    /// Decide the record that results from adding `amount` units.
    ///
    /// Does not mutate `self`; on rejection the caller keeps the current record.
    pub fn increment(&self, amount: u32) -> Result<Beer, StockViolation> {
        let requested = self.quantity as i128 + amount as i128;
        if requested > self.max as i128 {
            return Err(StockViolation::Exceeded {
                requested,
                max: self.max,
            });
        }
        Ok(self.with_quantity(requested as i64))
    }

    /// Decide the record that results from removing `amount` units.
    pub fn decrement(&self, amount: u32) -> Result<Beer, StockViolation> {
        let requested = self.quantity as i128 - amount as i128;
        if requested < 0 {
            return Err(StockViolation::BelowZero { requested });
        }
        Ok(self.with_quantity(requested as i64))
    }

    fn with_quantity(&self, quantity: i64) -> Beer {
        Beer {
            quantity,
            ..self.clone()
        }
    }
}

impl Entity for Beer {
    type Id = BeerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
