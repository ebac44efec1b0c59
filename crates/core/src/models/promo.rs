use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MAX_CODE_LENGTH, bounded};
use crate::errors::{BookitError, BookitResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Flat,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Flat => "flat",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountType {
    type Err = BookitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "flat" => Ok(DiscountType::Flat),
            other => Err(BookitError::Validation(format!(
                "Unknown discount type '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promo {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub is_active: bool,
}

/// Promo codes are matched case-insensitively by storing and looking them up
/// in trimmed upper case.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromoRequest {
    #[serde(default)]
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPromo {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub is_active: bool,
}

impl CreatePromoRequest {
    pub fn validate(&self) -> BookitResult<NewPromo> {
        let code = normalize_code(&self.code);
        if code.is_empty() {
            return Err(BookitError::Validation(
                "Promo code is required".to_string(),
            ));
        }
        let code = bounded(code, "code", MAX_CODE_LENGTH)?;
        if self.discount_value < 0 {
            return Err(BookitError::Validation(
                "discountValue must not be negative".to_string(),
            ));
        }
        if self.discount_type == DiscountType::Percentage && self.discount_value > 100 {
            return Err(BookitError::Validation(
                "Percentage discounts cannot exceed 100".to_string(),
            ));
        }

        Ok(NewPromo {
            code,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatePromoRequest {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePromoResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_value: Option<i64>,
    pub message: String,
}

impl ValidatePromoResponse {
    pub fn from_lookup(promo: Option<Promo>) -> Self {
        match promo {
            Some(promo) => Self {
                valid: true,
                discount_type: Some(promo.discount_type),
                discount_value: Some(promo.discount_value),
                message: "Promo code applied successfully".to_string(),
            },
            None => Self {
                valid: false,
                discount_type: None,
                discount_value: None,
                message: "Invalid or inactive promo code".to_string(),
            },
        }
    }
}
