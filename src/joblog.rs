use tracing::{error, info, warn};

/// Severity levels accepted by the job logging collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// Logging collaborator for import jobs.
///
/// The external scheduler that triggers an import passes one of these so
/// progress and warnings surface in its own reporting. Messages carry an
/// optional reference to the subject record (its id). The importer tolerates
/// running without one; all logging calls become no-ops.
pub trait JobLog: Send + Sync {
    fn log(&self, level: LogLevel, message: &str, subject: Option<&str>);
}

/// Fans messages out to tracing and, when present, the job log collaborator.
pub struct Reporter<'a> {
    log: Option<&'a dyn JobLog>,
}

impl<'a> Reporter<'a> {
    pub fn new(log: Option<&'a dyn JobLog>) -> Self {
        Reporter { log }
    }

    pub fn info(&self, message: &str, subject: Option<&str>) {
        info!("{}", message);
        if let Some(log) = self.log {
            log.log(LogLevel::Info, message, subject);
        }
    }

    pub fn warning(&self, message: &str, subject: Option<&str>) {
        warn!("{}", message);
        if let Some(log) = self.log {
            log.log(LogLevel::Warning, message, subject);
        }
    }

    pub fn error(&self, message: &str, subject: Option<&str>) {
        error!("{}", message);
        if let Some(log) = self.log {
            log.log(LogLevel::Error, message, subject);
        }
    }
}
