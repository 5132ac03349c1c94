pub mod decision;
pub mod item;
pub mod profile;
