use crate::lotto_picture::render::View;
use std::error::Error;

pub trait Display: Send + Sync {
    /// Show the latest projection of the application state.
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Put share text where the user can paste it.
    fn copy_text(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;
}
