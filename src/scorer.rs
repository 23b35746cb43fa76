pub mod image;
pub mod impl_fake;
pub mod impl_tract;
pub mod interface;
pub mod model_config;
pub mod session;
