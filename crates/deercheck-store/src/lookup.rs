//! Reorder lookups shared by the HTTP API and the operator CLI.
//!
//! Lookup by id and lookup by phone are separate entry points; neither falls
//! back to the other.

use crate::error::StoreError;
use crate::Store;
use deercheck_core::domain::{build_search_pattern, is_valid_length, OrderId};
use deercheck_core::{CoreError, ReorderDto};
use thiserror::Error;
use tracing::debug;

pub const ORDER_ID_REQUIRED: &str = "Order ID is required";
pub const PHONE_REQUIRED: &str = "A valid 10-digit phone number is required";
pub const ORDER_NOT_FOUND: &str = "Order not found";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("Order not found")]
    NotFound,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub fn previous_order_by_id(store: &Store, raw_id: &str) -> Result<ReorderDto, LookupError> {
    let id = OrderId::parse(raw_id).map_err(|err| match err {
        CoreError::EmptyId => LookupError::InvalidInput(ORDER_ID_REQUIRED),
        _ => LookupError::NotFound,
    })?;
    let order = store.orders().get(&id)?.ok_or(LookupError::NotFound)?;
    debug!(order_id = %order.id, "previous order found");
    Ok(ReorderDto::from_order(&order))
}

/// Most recent order whose stored phone fuzzily matches `phone`.
pub fn previous_order_by_phone(store: &Store, phone: &str) -> Result<ReorderDto, LookupError> {
    if !is_valid_length(phone) {
        return Err(LookupError::InvalidInput(PHONE_REQUIRED));
    }
    let pattern = build_search_pattern(phone);
    let order = store
        .orders()
        .latest_by_phone_pattern(&pattern)?
        .ok_or(LookupError::NotFound)?;
    debug!(order_id = %order.id, "previous order matched by phone");
    Ok(ReorderDto::from_order(&order))
}
