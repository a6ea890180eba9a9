pub mod cancel_order;
pub mod create_market;
pub mod match_orders;
pub mod place_order;

pub use cancel_order::*;
pub use create_market::*;
pub use match_orders::*;
pub use place_order::*;
