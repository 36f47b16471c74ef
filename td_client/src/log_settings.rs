//! Pass-through control of the engine's internal log.
//!
//! These run through synchronous execution, so they work before the
//! engine is initialised and never touch the backlog.

use crate::correlator::Correlator;
use crate::error::ClientResult;
use td_schema::{Decoder, Function, LogStream, Request, TdObject};
use td_transport::Transport;

impl<T: Transport, D: Decoder> Correlator<T, D> {
    /// Sets the verbosity of the engine's internal log
    ///
    /// 0 is fatal errors only, 1 errors, 2 warnings, 3 informational,
    /// 4 debug, 5 verbose debug; values up to 1023 enable even more output.
    pub fn set_log_verbosity_level(&mut self, level: i32) -> ClientResult<&mut Self> {
        self.execute(&Request::new(Function::SetLogVerbosityLevel {
            new_verbosity_level: level,
        }))?;
        Ok(self)
    }

    /// Returns the current verbosity, if the engine answered
    pub fn log_verbosity_level(&mut self) -> ClientResult<Option<i32>> {
        let response = self.execute(&Request::new(Function::GetLogVerbosityLevel))?;
        Ok(response.and_then(|response| match response.object {
            TdObject::LogVerbosityLevel { verbosity_level } => Some(verbosity_level),
            _ => None,
        }))
    }

    /// Writes the internal log to `path`, rotated after `max_file_size` bytes
    ///
    /// Without a size limit the file is never rotated.
    pub fn set_log_to_file(
        &mut self,
        path: impl Into<String>,
        max_file_size: Option<i64>,
    ) -> ClientResult<&mut Self> {
        let stream = LogStream::file(path, max_file_size.unwrap_or(i64::MAX));
        self.set_log_stream(stream)
    }

    /// Writes the internal log to stderr
    pub fn set_log_to_stderr(&mut self) -> ClientResult<&mut Self> {
        self.set_log_stream(LogStream::LogStreamDefault)
    }

    /// Disables the internal log
    pub fn set_log_to_none(&mut self) -> ClientResult<&mut Self> {
        self.set_log_stream(LogStream::LogStreamEmpty)
    }

    fn set_log_stream(&mut self, log_stream: LogStream) -> ClientResult<&mut Self> {
        self.execute(&Request::new(Function::SetLogStream { log_stream }))?;
        Ok(self)
    }
}
