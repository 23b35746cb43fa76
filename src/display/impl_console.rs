use crate::display::interface::Display;
use crate::lotto::number_set::BallColor;
use crate::lotto_picture::render::{Ball, View};
use crate::lotto_picture::text::{text, Text};
use std::error::Error;

pub struct DisplayConsole {
    color: bool,
    last_lines: Vec<String>,
}

impl DisplayConsole {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            last_lines: vec![],
        }
    }

    fn paint_ball(&self, ball: &Ball) -> String {
        if !self.color {
            return format!("({})", ball.label);
        }
        let background = match ball.color {
            BallColor::Yellow => 43,
            BallColor::Blue => 44,
            BallColor::Red => 41,
            BallColor::Gray => 100,
            BallColor::Green => 42,
        };
        format!("\x1b[1;97;{}m {} \x1b[0m", background, ball.label)
    }

    pub fn balls_line(&self, balls: &[Ball]) -> String {
        balls
            .iter()
            .map(|ball| self.paint_ball(ball))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Plain text rendering of a view, one entry per line.
pub fn view_lines(view: &View, balls_line: &str) -> Vec<String> {
    let mut lines = vec![view.status_text.clone()];

    if !view.balls.is_empty() {
        lines.push(balls_line.to_string());
    }
    if let Some(confidence) = &view.confidence_text {
        lines.push(confidence.clone());
    }
    if let Some(notice) = &view.notice_text {
        lines.push(notice.clone());
    }
    if let Some(error) = &view.error_text {
        lines.push(format!("! {}", error));
    }
    if !view.balls.is_empty() {
        lines.push(text(view.language, Text::Tip).to_string());
    }

    lines
}

impl Display for DisplayConsole {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        let lines = view_lines(view, &self.balls_line(&view.balls));
        if lines == self.last_lines {
            return Ok(());
        }

        println!("┌────────────────────────────────");
        for line in &lines {
            println!("│ {}", line);
        }
        println!("└────────────────────────────────");

        self.last_lines = lines;
        Ok(())
    }

    fn copy_text(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        // No clipboard in a terminal; print it for the user to copy.
        println!("{}", text);
        Ok(())
    }
}
