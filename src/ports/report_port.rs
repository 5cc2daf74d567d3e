//! Report rendering port.

use crate::domain::error::StockscopeError;
use crate::domain::evaluator::Evaluation;

/// Port for turning an evaluation into printable output.
pub trait ReportPort {
    fn render(&self, evaluation: &Evaluation) -> Result<String, StockscopeError>;

    /// Default implementation: renders each evaluation and joins them with a blank line.
    fn render_all(&self, evaluations: &[Evaluation]) -> Result<String, StockscopeError> {
        let parts = evaluations
            .iter()
            .map(|e| self.render(e))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join("\n"))
    }
}
