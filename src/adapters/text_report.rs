//! Plain-text report adapter for the terminal.

use std::fmt::Write;

use crate::domain::error::StockscopeError;
use crate::domain::evaluator::Evaluation;
use crate::ports::report_port::ReportPort;

pub struct TextReport;

impl TextReport {
    fn write_report(out: &mut String, evaluation: &Evaluation) -> std::fmt::Result {
        let result = &evaluation.result;
        writeln!(out, "== {} | {} ==", evaluation.code, result.title)?;
        if let Some(price) = evaluation.price {
            writeln!(out, "Price:  {:.2}", price)?;
        }
        writeln!(out, "Signal: {} ({})", result.signal, result.bias.label())?;
        if !result.description.is_empty() {
            writeln!(out, "{}", result.description)?;
        }

        if !result.values.is_empty() {
            let width = result
                .values
                .iter()
                .map(|row| row.label.chars().count())
                .max()
                .unwrap_or(0);
            writeln!(out)?;
            for row in &result.values {
                writeln!(out, "  {:<width$}  {}", row.label, row.value, width = width)?;
            }
        }

        if let Some(chart) = &evaluation.chart {
            if let (Some(first), Some(last)) = (chart.dates.first(), chart.dates.last()) {
                writeln!(out)?;
                writeln!(
                    out,
                    "Chart: {} closes from {} to {}",
                    chart.closes.len(),
                    first,
                    last
                )?;
            }
        }
        Ok(())
    }
}

impl ReportPort for TextReport {
    fn render(&self, evaluation: &Evaluation) -> Result<String, StockscopeError> {
        let mut out = String::new();
        Self::write_report(&mut out, evaluation)
            .map_err(|e| StockscopeError::Io(std::io::Error::other(e)))?;
        Ok(out)
    }
}
