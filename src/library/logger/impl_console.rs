use crate::library::logger::interface::Logger;
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LoggerConsole {
    namespace: Option<String>,
    timezone: FixedOffset,
    verbose: bool,
}

impl LoggerConsole {
    pub fn new(timezone: FixedOffset) -> Self {
        Self {
            namespace: None,
            timezone,
            verbose: true,
        }
    }

    /// Only errors are printed when `verbose` is false.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn format_line(&self, now: DateTime<Utc>, level: &str, message: &str) -> String {
        let local_time = now.with_timezone(&self.timezone);
        let formatted = local_time.format("%Y-%m-%d %I:%M:%S%.3f %p");
        match &self.namespace {
            Some(namespace) => format!("[{}] {} {}: {}", formatted, level, namespace, message),
            None => format!("[{}] {} {}", formatted, level, message),
        }
    }
}

impl Logger for LoggerConsole {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.verbose {
            println!("{}", self.format_line(Utc::now(), "INFO", message));
        }
        Ok(())
    }

    fn error(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        eprintln!("{}", self.format_line(Utc::now(), "ERROR", message));
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        let new_namespace = match &self.namespace {
            Some(current) => format!("{}:{}", current, namespace),
            None => namespace.to_string(),
        };

        Arc::new(LoggerConsole {
            namespace: Some(new_namespace),
            timezone: self.timezone,
            verbose: self.verbose,
        })
    }
}
