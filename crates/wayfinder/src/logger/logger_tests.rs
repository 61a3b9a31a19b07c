//! Tests for logger level ordering and capture sink.

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert_eq!(LogLevel::Warning.as_str(), "WARNING");
    }

    #[test]
    fn test_memory_logger_captures_lines() {
        let logger = MemoryLogger::new();
        logger.log(LogLevel::Info, "route ready");
        logger.log(LogLevel::Error, "mesh query failed");

        let lines = logger.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].0, LogLevel::Error);
        assert!(logger.contains("route ready"));
        assert!(!logger.contains("arrived"));
    }

    #[test]
    fn test_memory_logger_clones_share_buffer() {
        let logger = MemoryLogger::new();
        let handle = logger.clone();
        handle.log(LogLevel::Debug, "tick");
        assert_eq!(logger.lines().len(), 1);
    }
}
