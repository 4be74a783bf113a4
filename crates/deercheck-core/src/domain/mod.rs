pub mod ids;
pub mod order;
pub mod phone;

pub use ids::OrderId;
pub use order::{phone_text, OrderDocument};
pub use phone::{
    build_search_pattern, format_for_display, is_valid_length, normalize as normalize_phone,
    SearchPattern,
};
