pub mod orders;

pub use orders::{OrderNew, OrdersRepo};
