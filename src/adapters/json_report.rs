//! JSON report adapter (serde_json).

use crate::domain::error::StockscopeError;
use crate::domain::evaluator::Evaluation;
use crate::ports::report_port::ReportPort;

pub struct JsonReport {
    pub pretty: bool,
}

impl ReportPort for JsonReport {
    fn render(&self, evaluation: &Evaluation) -> Result<String, StockscopeError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(evaluation)
        } else {
            serde_json::to_string(evaluation)
        };
        rendered.map_err(|e| StockscopeError::Io(std::io::Error::other(e)))
    }

    fn render_all(&self, evaluations: &[Evaluation]) -> Result<String, StockscopeError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(evaluations)
        } else {
            serde_json::to_string(evaluations)
        };
        rendered.map_err(|e| StockscopeError::Io(std::io::Error::other(e)))
    }
}
