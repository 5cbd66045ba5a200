//! Order service data model.
//!
//! # Purpose
//! Re-exports the order record, status labels, menu, and intake types used by
//! the API and store layers.
mod order;

pub use order::{
    DEFAULT_BEVERAGES, DEFAULT_MAX_QUANTITY, IntakeError, InvalidStatus, Menu, NewOrder, Order,
    OrderRequest, OrderStatus, format_timestamp,
};
