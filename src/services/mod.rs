// Core services
pub mod catalog;
pub mod reorder;
pub mod stock_history;
