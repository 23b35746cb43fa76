use crate::display::interface::Display;
use crate::lotto_picture::render::View;
use std::error::Error;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct DisplayFake {
    views: Arc<Mutex<Vec<View>>>,
    copied: Arc<Mutex<Vec<String>>>,
}

impl DisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_view(&self) -> Option<View> {
        self.views.lock().ok().and_then(|views| views.last().cloned())
    }

    pub fn render_count(&self) -> usize {
        self.views.lock().map(|views| views.len()).unwrap_or(0)
    }

    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Display for DisplayFake {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.views
            .lock()
            .map_err(|e| e.to_string())?
            .push(view.clone());
        Ok(())
    }

    fn copy_text(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.copied
            .lock()
            .map_err(|e| e.to_string())?
            .push(text.to_string());
        Ok(())
    }
}
