pub mod enhance;
pub mod generate;
pub mod generations;
pub mod health;
