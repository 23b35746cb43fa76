pub mod core;
pub mod main;
pub mod render;
pub mod run_effect;
pub mod share;
pub mod text;

#[cfg(test)]
mod tests;
