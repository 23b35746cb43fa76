pub mod label;
pub mod number_set;
pub mod prediction;
pub mod selector;
