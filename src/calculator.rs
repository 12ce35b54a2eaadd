use crate::calc_engine::{
    evaluate_expression, evaluate_expression_traced, format_result, CalcError, EvaluationTrace,
    Step,
};
use chrono::{DateTime, Local};
use log::{debug, warn};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

pub struct HistoryEntry {
    pub expression: String,
    /// Formatted result, or the error message prefixed with `Error: `.
    pub display: String,
    pub outcome: Result<f64, CalcError>,
    pub detailed: bool,
    /// Only filled for detailed calculations.
    pub steps: Vec<Step>,
    pub duration: Duration,
    /// Wall-clock time the calculation was made.
    pub timestamp: DateTime<Local>,
}

impl HistoryEntry {
    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }
}

// 14:03:27: 2 + 2 = 4
impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} = {}", self.timestamp.format("%H:%M:%S"), self.expression, self.display)
    }
}

/// Argument of the memory operations: a plain value or an expression to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(f64),
    Expression(String),
}

impl Operand {
    /// An empty expression counts as zero.
    pub fn resolve(&self) -> Result<f64, CalcError> {
        match self {
            Operand::Value(value) => Ok(*value),
            Operand::Expression(expr) if expr.trim().is_empty() => Ok(0.0),
            Operand::Expression(expr) => evaluate_expression(expr),
        }
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Value(value)
    }
}

impl From<&str> for Operand {
    fn from(expr: &str) -> Self {
        Operand::Expression(expr.to_string())
    }
}

impl From<String> for Operand {
    fn from(expr: String) -> Self {
        Operand::Expression(expr)
    }
}

/// Stateful front for the expression pipeline: a bounded history of
/// calculations plus a single memory register. Each instance owns its state.
pub struct Calculator {
    memory: f64,
    history: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for Calculator {
    fn default() -> Self {
        Calculator::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Calculator::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Calculator {
            memory: 0.0,
            history: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Evaluates `expression` and returns the display string. Failures come
    /// back as `Error: <detail>`; nothing propagates. Blank input yields `0`
    /// and is not recorded.
    pub fn calculate(&mut self, expression: &str) -> String {
        match self.record(expression, false) {
            Some(entry) => entry.display.clone(),
            None => "0".to_string(),
        }
    }

    /// Like [`Calculator::calculate`] but keeps the evaluation steps in the
    /// history entry.
    pub fn calculate_detailed(&mut self, expression: &str) -> Option<&HistoryEntry> {
        self.record(expression, true)
    }

    fn record(&mut self, expression: &str, detailed: bool) -> Option<&HistoryEntry> {
        let expression = expression.trim();
        if expression.is_empty() {
            return None;
        }

        let timestamp = Local::now();
        let start_time = Instant::now();
        let mut trace = EvaluationTrace::new(detailed);
        let outcome = evaluate_expression_traced(expression, &mut trace);
        let duration = start_time.elapsed();

        let display = match &outcome {
            Ok(value) => format_result(*value),
            Err(e) => {
                warn!("{:?} failed: {}", expression, e);
                format!("Error: {}", e)
            }
        };

        self.push_history(HistoryEntry {
            expression: expression.to_string(),
            display,
            outcome,
            detailed,
            steps: trace.steps,
            duration,
            timestamp,
        });
        self.history.back()
    }

    fn push_history(&mut self, entry: HistoryEntry) {
        self.history.push_back(entry);
        while self.history.len() > self.capacity {
            if let Some(evicted) = self.history.pop_front() {
                debug!("history full, dropping {:?}", evicted.expression);
            }
        }
    }

    /// Oldest first.
    pub fn history(&self) -> &VecDeque<HistoryEntry> {
        &self.history
    }

    pub fn history_capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn memory_add(&mut self, operand: impl Into<Operand>) -> Result<f64, CalcError> {
        let value = operand.into().resolve()?;
        self.memory += value;
        Ok(self.memory)
    }

    pub fn memory_subtract(&mut self, operand: impl Into<Operand>) -> Result<f64, CalcError> {
        let value = operand.into().resolve()?;
        self.memory -= value;
        Ok(self.memory)
    }

    pub fn memory_store(&mut self, operand: impl Into<Operand>) -> Result<f64, CalcError> {
        self.memory = operand.into().resolve()?;
        Ok(self.memory)
    }

    pub fn memory_recall(&self) -> f64 {
        self.memory
    }

    pub fn memory_clear(&mut self) {
        self.memory = 0.0;
    }

    pub fn has_memory(&self) -> bool {
        self.memory != 0.0
    }
}
