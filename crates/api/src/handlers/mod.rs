pub mod health;
pub mod scripts;
