//! Stepviz Trace
//!
//! Turns an algorithm id plus loosely-typed input into an ordered, immutable
//! list of execution steps, each pointing at a source line and a flow-graph
//! node to highlight.
//!
//! # Architecture
//!
//! - **Catalogue**: static metadata for the nine built-in algorithms
//! - **Input**: best-effort normalization of numbers, lists, text and queries
//! - **Simulators**: bubble sort, binary search, and a generic fallback
//! - **Flowchart**: keyword-matched diagrams for algorithms without a declared one
//!
//! # Usage
//!
//! ```
//! use stepviz_trace::{simulate, RawInput};
//!
//! let trace = simulate("bubble-sort", &RawInput::from("[3, 1, 2]")).unwrap();
//! assert_eq!(trace.last().unwrap().message, "Final sorted array: [1, 2, 3]");
//! ```

pub mod catalogue;
mod error;
pub mod flowchart;
mod input;
mod simulate;
mod step;

pub use catalogue::{AlgorithmDescriptor, Category, FlowSpec};
pub use error::{Error, Result};
pub use input::{format_list, format_number, NormalizedInput, RawInput, SearchQuery, Token};
pub use simulate::{simulate, simulate_or_fallback, Simulator, SEARCH_SAMPLE};
pub use step::{ExecutionStep, Trace};
