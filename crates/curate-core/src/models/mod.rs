pub mod authoritative;
pub mod score;
pub mod validation;
