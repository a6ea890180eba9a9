pub mod fees;
pub mod market;
pub mod order;
pub mod orderbook;

pub use fees::*;
pub use market::*;
pub use order::*;
pub use orderbook::*;
