use chrono::Local;
use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn parse(value: &str) -> Option<LogLevel> {
        match value.trim().to_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Named console logger: `[HH:MM:SS][LEVEL][NAME] → message`.
#[derive(Debug, Clone)]
pub struct Logger {
    pub name: String,
    pub info_color: Color,
    /// Mensajes por debajo de este nivel se descartan.
    pub level: LogLevel,
}

impl Logger {
    pub fn new(name: impl Into<String>, info_color: Color) -> Self {
        Self {
            name: name.into().to_uppercase(),
            info_color,
            level: LogLevel::Info,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Same sink and threshold under another name.
    pub fn named(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_uppercase(),
            ..self.clone()
        }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    fn timestamp() -> String {
        Local::now().format("%H:%M:%S").to_string()
    }

    fn prefix(&self, level: LogLevel) -> String {
        format!("[{}][{}][{}]", Self::timestamp(), level.tag(), self.name)
    }

    pub fn debug(&self, msg: impl AsRef<str>) {
        if !self.enabled(LogLevel::Debug) {
            return;
        }
        println!(
            "{} {} {}",
            self.prefix(LogLevel::Debug).dimmed(),
            "→".dimmed(),
            msg.as_ref().dimmed()
        );
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.enabled(LogLevel::Info) {
            return;
        }
        println!(
            "{} {} {}",
            self.prefix(LogLevel::Info).bold().color(self.info_color),
            "→".dimmed(),
            msg.as_ref()
        );
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if !self.enabled(LogLevel::Warn) {
            return;
        }
        println!(
            "{} {} {}",
            self.prefix(LogLevel::Warn).bold().yellow(),
            "→".dimmed(),
            msg.as_ref()
        );
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        eprintln!(
            "{} {} {}",
            self.prefix(LogLevel::Error).bold().bright_red(),
            "→".dimmed(),
            msg.as_ref()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_filters_lower_levels() {
        let logger = Logger::new("monitor", Color::Green).with_level(LogLevel::Warn);
        assert!(!logger.enabled(LogLevel::Debug));
        assert!(!logger.enabled(LogLevel::Info));
        assert!(logger.enabled(LogLevel::Warn));
        assert!(logger.enabled(LogLevel::Error));
    }

    #[test]
    fn test_named_keeps_level_and_upper_cases_name() {
        let logger = Logger::new("console", Color::Cyan).with_level(LogLevel::Debug);
        let child = logger.named("api");
        assert_eq!(child.name, "API");
        assert_eq!(child.level, LogLevel::Debug);
        assert!(child.prefix(LogLevel::Info).ends_with("[INFO][API]"));
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse(" debug "), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("verbose"), None);
    }
}
