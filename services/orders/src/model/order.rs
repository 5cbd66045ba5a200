//! Order records, status labels, and intake validation.
//!
//! # Purpose
//! Defines the single persisted entity and the rules a submitted request must
//! satisfy before any store sees it.
//!
//! # Key invariants
//! - Every order starts `Pending`; only the status changes after creation.
//! - Registration is a staff badge number of at most three digits.
//! - Beverage names come from the configured [`Menu`].
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

pub const DEFAULT_BEVERAGES: [&str; 6] = [
    "Water",
    "Beer",
    "Gin",
    "Pink Gin",
    "Smirnoff Cola",
    "Captain Morgan",
];

pub const DEFAULT_MAX_QUANTITY: i64 = 999;

const MAX_REGISTRATION_DIGITS: usize = 3;

// en-GB `toLocaleString` layout: 19/10/2026, 14:03:22
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: i64,
    pub registration: String,
    pub beverage: String,
    pub quantity: i64,
    pub status: OrderStatus,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Ready,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 2] = [OrderStatus::Pending, OrderStatus::Ready];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Ready => "Ready",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a status label is not one of [`OrderStatus::ALL`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid status")]
pub struct InvalidStatus(pub String);

impl FromStr for OrderStatus {
    type Err = InvalidStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(OrderStatus::Pending),
            "Ready" => Ok(OrderStatus::Ready),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// A validated order that has not been assigned an id yet.
///
/// Stores assign `id` and the initial `Pending` status when persisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub registration: String,
    pub beverage: String,
    pub quantity: i64,
    pub timestamp: String,
}

impl NewOrder {
    pub fn into_order(self, id: i64) -> Order {
        Order {
            id,
            registration: self.registration,
            beverage: self.beverage,
            quantity: self.quantity,
            status: OrderStatus::Pending,
            timestamp: self.timestamp,
        }
    }
}

/// Order submission as received from a caller.
///
/// Every field is optional on the wire so a missing field produces a
/// field-level [`IntakeError`] instead of a body parse failure.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct OrderRequest {
    pub registration: Option<String>,
    pub beverage: Option<String>,
    pub quantity: Option<i64>,
}

/// Field-level rejection of an [`OrderRequest`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("registration is required")]
    MissingRegistration,
    #[error("registration must be 1 to 3 digits")]
    InvalidRegistration,
    #[error("beverage is required")]
    MissingBeverage,
    #[error("beverage must be one of: {menu}")]
    UnknownBeverage { menu: String },
    #[error("quantity is required")]
    MissingQuantity,
    #[error("quantity must be a positive integer")]
    NonPositiveQuantity,
    #[error("quantity must not exceed {max}")]
    QuantityTooLarge { max: i64 },
}

impl IntakeError {
    pub fn field(&self) -> &'static str {
        match self {
            IntakeError::MissingRegistration | IntakeError::InvalidRegistration => "registration",
            IntakeError::MissingBeverage | IntakeError::UnknownBeverage { .. } => "beverage",
            IntakeError::MissingQuantity
            | IntakeError::NonPositiveQuantity
            | IntakeError::QuantityTooLarge { .. } => "quantity",
        }
    }
}

/// The beverages staff may request and the per-order quantity bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    beverages: Vec<String>,
    max_quantity: i64,
}

impl Default for Menu {
    fn default() -> Self {
        Self {
            beverages: DEFAULT_BEVERAGES.iter().map(|b| b.to_string()).collect(),
            max_quantity: DEFAULT_MAX_QUANTITY,
        }
    }
}

impl Menu {
    pub fn new(beverages: Vec<String>, max_quantity: i64) -> Self {
        Self {
            beverages,
            max_quantity,
        }
    }

    pub fn beverages(&self) -> &[String] {
        &self.beverages
    }

    pub fn max_quantity(&self) -> i64 {
        self.max_quantity
    }

    pub fn contains(&self, beverage: &str) -> bool {
        self.beverages.iter().any(|item| item == beverage)
    }

    /// Validate a submission and stamp it with the current local time.
    ///
    /// Fields are checked in the order registration, beverage, quantity and
    /// the first failure is returned.
    pub fn intake(&self, request: &OrderRequest) -> Result<NewOrder, IntakeError> {
        self.intake_at(request, Local::now())
    }

    pub fn intake_at(
        &self,
        request: &OrderRequest,
        now: DateTime<Local>,
    ) -> Result<NewOrder, IntakeError> {
        let registration = request
            .registration
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(IntakeError::MissingRegistration)?;
        if registration.len() > MAX_REGISTRATION_DIGITS
            || !registration.chars().all(|c| c.is_ascii_digit())
        {
            return Err(IntakeError::InvalidRegistration);
        }

        let beverage = request
            .beverage
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(IntakeError::MissingBeverage)?;
        if !self.contains(beverage) {
            return Err(IntakeError::UnknownBeverage {
                menu: self.beverages.join(", "),
            });
        }

        let quantity = request.quantity.ok_or(IntakeError::MissingQuantity)?;
        if quantity <= 0 {
            return Err(IntakeError::NonPositiveQuantity);
        }
        if quantity > self.max_quantity {
            return Err(IntakeError::QuantityTooLarge {
                max: self.max_quantity,
            });
        }

        Ok(NewOrder {
            registration: registration.to_string(),
            beverage: beverage.to_string(),
            quantity,
            timestamp: format_timestamp(now),
        })
    }
}

pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}
