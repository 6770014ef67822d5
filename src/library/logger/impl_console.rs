use crate::library::logger::interface::{join_namespace, Logger};
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConsole {
    namespace: Option<String>,
    timezone: FixedOffset,
}

impl LoggerConsole {
    pub fn new(timezone: FixedOffset) -> Self {
        Self {
            namespace: None,
            timezone,
        }
    }

    fn write(&self, level: Level, message: &str) {
        let line = format_line(
            Utc::now(),
            &self.timezone,
            level,
            self.namespace.as_deref(),
            message,
        );
        match level {
            Level::Error | Level::Warn => eprintln!("{}", line),
            Level::Info => println!("{}", line),
        }
    }
}

pub fn format_line(
    utc_now: DateTime<Utc>,
    timezone: &FixedOffset,
    level: Level,
    namespace: Option<&str>,
    message: &str,
) -> String {
    let formatted = utc_now
        .with_timezone(timezone)
        .format("%Y-%m-%d %I:%M:%S%.3f %p");
    match namespace {
        Some(namespace) => format!(
            "[{}] {} {}: {}",
            formatted,
            level.as_str(),
            namespace,
            message
        ),
        None => format!("[{}] {} {}", formatted, level.as_str(), message),
    }
}

impl Logger for LoggerConsole {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.write(Level::Info, message);
        Ok(())
    }

    fn warn(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.write(Level::Warn, message);
        Ok(())
    }

    fn error(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.write(Level::Error, message);
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerConsole {
            namespace: Some(join_namespace(self.namespace.as_deref(), namespace)),
            timezone: self.timezone,
        })
    }
}
