//! Per-algorithm step simulators.
//!
//! Each simulator is a deterministic function of its normalized input. The
//! set is closed: [`Simulator::resolve`] maps an algorithm id onto one of
//! the bespoke variants or the generic arm.

use crate::catalogue;
use crate::error::{Error, Result};
use crate::flowchart;
use crate::input::{format_list, format_number, NormalizedInput, RawInput, Token};
use crate::step::{ExecutionStep, StepLog, Trace};

/// Sample array searched when the input is a lone target.
pub const SEARCH_SAMPLE: [f64; 10] = [2.0, 5.0, 8.0, 12.0, 16.0, 23.0, 38.0, 45.0, 67.0, 77.0];

/// Simulator selected for an algorithm id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Simulator {
    BubbleSort,
    BinarySearch,
    /// Three-step placeholder trace for algorithms without a bespoke simulator
    Generic,
}

impl Simulator {
    /// Map an algorithm id (or display name) to its simulator.
    pub fn resolve(algorithm_id: &str) -> Self {
        match catalogue::normalize_id(algorithm_id).as_str() {
            "bubble-sort" | "bubblesort" => Simulator::BubbleSort,
            "binary-search" | "binarysearch" => Simulator::BinarySearch,
            _ => Simulator::Generic,
        }
    }

    /// Produce the steps for one run.
    pub fn run(self, name: &str, input: &NormalizedInput) -> Vec<ExecutionStep> {
        match self {
            Simulator::BubbleSort => bubble_sort(input),
            Simulator::BinarySearch => binary_search(input),
            Simulator::Generic => generic(name, input),
        }
    }
}

/// Simulate a run with a bespoke simulator.
///
/// Fails only with [`Error::UnsupportedAlgorithm`] when the id has none.
pub fn simulate(algorithm_id: &str, input: &RawInput) -> Result<Trace> {
    match Simulator::resolve(algorithm_id) {
        Simulator::Generic => Err(Error::UnsupportedAlgorithm {
            id: algorithm_id.to_owned(),
        }),
        simulator => Ok(build(simulator, algorithm_id, input)),
    }
}

/// Simulate a run, falling back to the generic trace for unknown ids.
pub fn simulate_or_fallback(algorithm_id: &str, input: &RawInput) -> Trace {
    match simulate(algorithm_id, input) {
        Ok(trace) => trace,
        Err(err) => {
            tracing::warn!(algorithm = algorithm_id, "{err}; using generic trace");
            build(Simulator::Generic, algorithm_id, input)
        }
    }
}

fn build(simulator: Simulator, algorithm_id: &str, input: &RawInput) -> Trace {
    let descriptor = catalogue::lookup(algorithm_id);
    let name = descriptor.map_or(algorithm_id, |d| d.name.as_str());
    let flow_graph = match descriptor {
        Some(d) => d.flow_graph(),
        None => flowchart::flow_graph_for(name),
    };

    let steps = simulator.run(name, &input.normalize());
    tracing::debug!(algorithm = name, steps = steps.len(), "simulated trace");
    Trace::new(name.to_owned(), steps, flow_graph)
}

// Lines of the bubble sort listing in the catalogue.
const BUBBLE_LEN: u32 = 2;
const BUBBLE_OUTER: u32 = 3;
const BUBBLE_COMPARE: u32 = 6;
const BUBBLE_SWAP: u32 = 7;
const BUBBLE_RETURN: u32 = 11;

fn bubble_sort(input: &NormalizedInput) -> Vec<ExecutionStep> {
    let mut arr = input.values.clone();
    let n = arr.len();
    let mut log = StepLog::default();

    log.push("Start Bubble Sort", format!("Input array: {}", format_list(&arr)))
        .line(BUBBLE_LEN)
        .node("input")
        .snapshot(&arr);

    for i in 0..n.saturating_sub(1) {
        log.push(
            format!("Outer loop iteration {}", i + 1),
            format!("Checking positions 0 to {}", n - i - 1),
        )
        .line(BUBBLE_OUTER)
        .node("outer")
        .snapshot(&arr);

        for j in 0..n - i - 1 {
            log.push(
                format!("Compare {} and {}", arr[j], arr[j + 1]),
                format!("Comparing elements at indices {} and {}", j, j + 1),
            )
            .line(BUBBLE_COMPARE)
            .node("compare")
            .snapshot(&arr)
            .indices([j, j + 1]);

            if arr[j].is_greater_than(&arr[j + 1]) {
                arr.swap(j, j + 1);
                log.push(
                    format!("Swap {} and {}", arr[j], arr[j + 1]),
                    format!("Swapped! New order: {}", format_list(&arr)),
                )
                .line(BUBBLE_SWAP)
                .node("swap")
                .snapshot(&arr)
                .indices([j, j + 1])
                .swapped();
            }
        }
    }

    log.push("Complete", format!("Final sorted array: {}", format_list(&arr)))
        .line(BUBBLE_RETURN)
        .node("end")
        .snapshot(&arr)
        .terminal();

    log.finish()
}

const SEARCH_INIT: u32 = 2;
const SEARCH_MID: u32 = 4;
const SEARCH_FOUND: u32 = 6;
const SEARCH_LOW: u32 = 8;
const SEARCH_HIGH: u32 = 10;
const SEARCH_MISS: u32 = 11;

/// Array to search and the target, in that order of precedence:
/// explicit target, lone number against the sample, first element.
fn search_args(input: &NormalizedInput) -> (Vec<f64>, Option<Token>) {
    if let Some(target) = input.target {
        return (input.numbers(), Some(Token::Number(target)));
    }
    if let Some(target) = input.lone_number() {
        return (SEARCH_SAMPLE.to_vec(), Some(Token::Number(target)));
    }
    (input.numbers(), input.values.first().cloned())
}

fn binary_search(input: &NormalizedInput) -> Vec<ExecutionStep> {
    let (mut sorted, target) = search_args(input);
    sorted.sort_by(f64::total_cmp);
    let snapshot: Vec<Token> = sorted.iter().copied().map(Token::Number).collect();
    let shown = target.as_ref().map(ToString::to_string).unwrap_or_default();
    let wanted = target.as_ref().and_then(Token::as_number);
    let mut log = StepLog::default();

    let start = log
        .push(
            "Start Binary Search",
            format!("Searching for {shown} in sorted array {}", format_list(&snapshot)),
        )
        .line(SEARCH_INIT)
        .node("init")
        .snapshot(&snapshot);
    if let Some(wanted) = wanted {
        start.target(wanted);
    }

    let Some(wanted) = wanted else {
        // A text target can never match a numeric array.
        log.push("Not Found", format!("{shown} not found in array"))
            .line(SEARCH_MISS)
            .node("notfound")
            .terminal();
        return log.finish();
    };

    let (mut low, mut high) = (0isize, sorted.len() as isize - 1);
    while low <= high {
        let mid = ((low + high) / 2) as usize;
        let value = sorted[mid];
        log.push(
            format!("Check middle element at index {mid}"),
            format!("Checking middle element: {}", format_number(value)),
        )
        .line(SEARCH_MID)
        .node("check")
        .snapshot(&snapshot)
        .indices([low as usize, mid, high as usize]);

        if value == wanted {
            log.push("Found!", format!("Found {shown} at index {mid}!"))
                .line(SEARCH_FOUND)
                .node("found")
                .snapshot(&snapshot)
                .found_at(mid)
                .terminal();
            return log.finish();
        } else if value < wanted {
            low = mid as isize + 1;
            log.push(
                "Target is greater",
                format!("{shown} > {}, search right half", format_number(value)),
            )
            .line(SEARCH_LOW)
            .node("greater")
            .snapshot(&snapshot);
        } else {
            high = mid as isize - 1;
            log.push(
                "Target is smaller",
                format!("{shown} < {}, search left half", format_number(value)),
            )
            .line(SEARCH_HIGH)
            .node("smaller")
            .snapshot(&snapshot);
        }
    }

    log.push("Not Found", format!("{shown} not found in array"))
        .line(SEARCH_MISS)
        .node("notfound")
        .terminal();
    log.finish()
}

fn generic(name: &str, input: &NormalizedInput) -> Vec<ExecutionStep> {
    let mut log = StepLog::default();
    log.push("Start", format!("Processing algorithm: {name}"))
        .node("start")
        .snapshot(&input.values);
    log.push("Processing", format!("Algorithm {name} is executing..."));
    log.push("Complete", format!("Algorithm {name} completed"))
        .node("end")
        .snapshot(&input.values)
        .terminal();
    log.finish()
}
