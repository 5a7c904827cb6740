pub mod inventory_event;
pub mod item;
