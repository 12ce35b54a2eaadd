//! Arithmetic expression calculator.
//!
//! Expressions go through three stages: [`calc_engine::tokenize`] splits the
//! input, [`calc_engine::to_postfix`] reorders it with the shunting-yard
//! algorithm and [`calc_engine::evaluate`] runs the result on a value stack.
//! [`Calculator`] wraps the pipeline with history and a memory register.
//!
//! ```
//! use rpncalc::Calculator;
//!
//! let mut calc = Calculator::new();
//! assert_eq!(calc.calculate("2 ^ 3 ^ 2"), "512");
//! assert_eq!(calc.calculate("5 / 0"), "Error: division by zero");
//! ```

pub mod calc_engine;
pub mod calculator;

pub use calc_engine::{evaluate_expression, CalcError, ErrorKind};
pub use calculator::{Calculator, HistoryEntry, Operand};
