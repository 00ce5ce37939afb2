use serde::{Deserialize, Serialize};

use beerstock_core::Entity;
use beerstock_inventory::{Beer, BeerType, NewBeer};

pub const NAME_MAX_LEN: usize = 200;
pub const BRAND_MAX_LEN: usize = 200;
pub const MAX_CAPACITY: i64 = 500;
pub const MAX_QUANTITY: i64 = 100;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /api/v1/beers`.
///
/// Every field is optional at the serde level so a missing field becomes a
/// validation message instead of a deserialization failure. Any `id` sent by
/// the client is ignored; the store assigns it.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBeerRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub max: Option<i64>,
    pub quantity: Option<i64>,
    #[serde(rename = "type")]
    pub beer_type: Option<BeerType>,
}

impl CreateBeerRequest {
    /// Check every field and build the domain candidate.
    ///
    /// Returns all field problems at once, in declaration order.
    pub fn validate(self) -> Result<NewBeer, Vec<String>> {
        let mut problems = Vec::new();

        let name = required_text("name", self.name, NAME_MAX_LEN, &mut problems);
        let brand = required_text("brand", self.brand, BRAND_MAX_LEN, &mut problems);
        let max = required_range("max", self.max, 1, MAX_CAPACITY, &mut problems);
        let quantity = required_range("quantity", self.quantity, 0, MAX_QUANTITY, &mut problems);
        if self.beer_type.is_none() {
            problems.push("type is required".to_string());
        }

        let (Some(name), Some(brand), Some(max), Some(quantity), Some(beer_type)) =
            (name, brand, max, quantity, self.beer_type)
        else {
            return Err(problems);
        };

        NewBeer::new(name, brand, max, quantity, beer_type).map_err(|e| vec![e.to_string()])
    }
}

/// Body of `PATCH /api/v1/beers/{id}/increment` and `/decrement`.
#[derive(Debug, Default, Deserialize)]
pub struct QuantityRequest {
    pub quantity: Option<i64>,
}

impl QuantityRequest {
    pub fn validate(self) -> Result<u32, Vec<String>> {
        let mut problems = Vec::new();
        match required_range("quantity", self.quantity, 1, MAX_QUANTITY, &mut problems) {
            // Bounded by MAX_QUANTITY, so the cast cannot truncate.
            Some(q) => Ok(q as u32),
            None => Err(problems),
        }
    }
}

fn required_text(
    field: &str,
    value: Option<String>,
    max_len: usize,
    problems: &mut Vec<String>,
) -> Option<String> {
    match value {
        None => {
            problems.push(format!("{field} is required"));
            None
        }
        Some(v) if v.trim().is_empty() => {
            problems.push(format!("{field} must not be blank"));
            None
        }
        Some(v) if v.chars().count() > max_len => {
            problems.push(format!("{field} must be at most {max_len} characters"));
            None
        }
        Some(v) => Some(v),
    }
}

fn required_range(
    field: &str,
    value: Option<i64>,
    min: i64,
    max: i64,
    problems: &mut Vec<String>,
) -> Option<i64> {
    match value {
        None => {
            problems.push(format!("{field} is required"));
            None
        }
        Some(v) if v < min || v > max => {
            problems.push(format!("{field} must be between {min} and {max}"));
            None
        }
        Some(v) => Some(v),
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeerResponse {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub max: i64,
    pub quantity: i64,
    #[serde(rename = "type")]
    pub beer_type: BeerType,
}

pub fn beer_to_response(beer: &Beer) -> BeerResponse {
    BeerResponse {
        id: beer.id().get(),
        name: beer.name().to_string(),
        brand: beer.brand().to_string(),
        max: beer.max(),
        quantity: beer.quantity(),
        beer_type: beer.beer_type(),
    }
}

pub fn beers_to_response(beers: &[Beer]) -> Vec<BeerResponse> {
    beers.iter().map(beer_to_response).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use beerstock_core::BeerId;

    fn brahma_request() -> CreateBeerRequest {
        CreateBeerRequest {
            name: Some("Brahma".to_string()),
            brand: Some("Ambev".to_string()),
            max: Some(50),
            quantity: Some(10),
            beer_type: Some(BeerType::Lager),
        }
    }

    #[test]
    fn valid_request_builds_candidate() {
        let new = brahma_request().validate().unwrap();
        assert_eq!(new.name(), "Brahma");
        assert_eq!(new.brand(), "Ambev");
        assert_eq!(new.max(), 50);
        assert_eq!(new.quantity(), 10);
        assert_eq!(new.beer_type(), BeerType::Lager);
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let problems = CreateBeerRequest::default().validate().unwrap_err();
        assert_eq!(
            problems,
            vec![
                "name is required",
                "brand is required",
                "max is required",
                "quantity is required",
                "type is required",
            ]
        );
    }

    #[test]
    fn ranges_and_lengths_are_enforced() {
        let req = CreateBeerRequest {
            name: Some("x".repeat(NAME_MAX_LEN + 1)),
            max: Some(MAX_CAPACITY + 1),
            quantity: Some(-1),
            ..brahma_request()
        };
        let problems = req.validate().unwrap_err();
        assert_eq!(problems.len(), 3);
        assert!(problems[0].starts_with("name must be at most"));
        assert!(problems[1].starts_with("max must be between"));
        assert!(problems[2].starts_with("quantity must be between"));
    }

    #[test]
    fn quantity_above_capacity_is_rejected_at_creation() {
        let req = CreateBeerRequest {
            max: Some(5),
            quantity: Some(10),
            ..brahma_request()
        };
        let problems = req.validate().unwrap_err();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("exceeds max"));
    }

    #[test]
    fn create_body_ignores_client_id_and_reads_type_field() {
        let req: CreateBeerRequest = serde_json::from_str(
            r#"{"id": 99, "name": "Brahma", "brand": "Ambev", "max": 50, "quantity": 10, "type": "LAGER"}"#,
        )
        .unwrap();
        assert_eq!(req.beer_type, Some(BeerType::Lager));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn quantity_request_bounds() {
        assert_eq!(QuantityRequest { quantity: Some(1) }.validate(), Ok(1));
        assert_eq!(QuantityRequest { quantity: Some(100) }.validate(), Ok(100));
        assert!(QuantityRequest { quantity: Some(0) }.validate().is_err());
        assert!(QuantityRequest { quantity: Some(101) }.validate().is_err());
        assert_eq!(
            QuantityRequest { quantity: None }.validate(),
            Err(vec!["quantity is required".to_string()])
        );
    }

    #[test]
    fn response_uses_type_as_wire_name() {
        let beer = Beer::from_new(BeerId::new(1), brahma_request().validate().unwrap());
        let json = serde_json::to_value(beer_to_response(&beer)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "name": "Brahma",
                "brand": "Ambev",
                "max": 50,
                "quantity": 10,
                "type": "LAGER",
            })
        );
    }
}
