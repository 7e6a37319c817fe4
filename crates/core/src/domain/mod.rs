pub mod cart;
pub mod clearance;
pub mod product;
pub mod settings;
