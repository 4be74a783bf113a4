//! Projections of a past order that are safe to hand back to an anonymous
//! caller pre-filling a new check-in.
//!
//! Both outputs are built from explicit allow-lists. A key that is not named
//! here never leaves the record, whatever else the document carries.

use crate::domain::OrderDocument;
use serde_json::{Map, Value};

pub const CUSTOMER_INFO_FIELDS: &[&str] = &[
    "name",
    "firstName",
    "lastName",
    "phone",
    "altPhone",
    "email",
    "address",
    "city",
    "state",
    "zip",
];

pub const REORDER_PREFERENCE_FIELDS: &[&str] = &[
    "species",
    "hunterType",
    "cutInstructions",
    "cutType",
    "steaks",
    "steakThickness",
    "steaksPerPackage",
    "roasts",
    "roastSize",
    "groundVenison",
    "groundVenisonBagSize",
    "burgerFat",
    "sausage",
    "jerky",
    "boneless",
    "keepBackstrap",
    "keepTenderloins",
    "keepHeart",
    "keepLiver",
    "keepHide",
    "capeForMount",
    "skullCap",
    "euroMount",
    "vacuumSealed",
    "specialInstructions",
    "tagType",
    "tagState",
];

/// Known money-related keys. Not used to filter anything; tests check the
/// allow-lists above stay disjoint from it.
pub const FINANCIAL_FIELDS: &[&str] = &[
    "price",
    "basePrice",
    "totalPrice",
    "processingFee",
    "capeFee",
    "specialtyMeatFee",
    "deposit",
    "depositPaid",
    "depositAmount",
    "amountPaid",
    "balanceDue",
    "paymentStatus",
    "paymentMethod",
    "paid",
    "paidAt",
    "discount",
    "tax",
    "refundAmount",
];

pub fn extract_customer_info(order: &OrderDocument) -> Map<String, Value> {
    customer_info_from_fields(&order.fields)
}

pub fn extract_reorder_preferences(order: &OrderDocument) -> Map<String, Value> {
    reorder_preferences_from_fields(&order.fields)
}

pub fn customer_info_from_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    project(fields, CUSTOMER_INFO_FIELDS)
}

pub fn reorder_preferences_from_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    project(fields, REORDER_PREFERENCE_FIELDS)
}

fn project(fields: &Map<String, Value>, allowed: &[&str]) -> Map<String, Value> {
    let mut out = Map::new();
    for key in allowed {
        if let Some(value) = fields.get(*key) {
            out.insert((*key).to_string(), value.clone());
        }
    }
    out
}
