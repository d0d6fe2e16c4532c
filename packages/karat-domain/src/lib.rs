pub mod intent;
pub mod product;
pub mod slots;
pub mod turn;
