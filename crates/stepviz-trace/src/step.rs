//! Execution-step records and the traces built from them.

use serde::{Deserialize, Serialize};
use stepviz_flow::{FlowGraph, NodeId};

use crate::input::{serialize_opt_number, Token};

/// One discrete step of an algorithm run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
    /// Position in the trace, starting at 0
    pub index: usize,
    pub action: String,
    pub message: String,
    /// 1-based line of the algorithm's source text to highlight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<u32>,
    /// Flow-graph node to highlight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_node: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_snapshot: Option<Vec<Token>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_indices: Option<Vec<usize>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_number"
    )]
    pub target: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_index: Option<usize>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub swapped: bool,
    /// Set on the step that ends the run
    #[serde(default, skip_serializing_if = "is_false")]
    pub terminal: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl ExecutionStep {
    /// Create a bare step.
    pub fn new(index: usize, action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            index,
            action: action.into(),
            message: message.into(),
            source_line: None,
            flow_node: None,
            array_snapshot: None,
            highlighted_indices: None,
            target: None,
            found_index: None,
            swapped: false,
            terminal: false,
        }
    }

    pub fn line(&mut self, line: u32) -> &mut Self {
        self.source_line = Some(line);
        self
    }

    pub fn node(&mut self, node: &str) -> &mut Self {
        self.flow_node = Some(NodeId::from(node));
        self
    }

    pub fn snapshot(&mut self, values: &[Token]) -> &mut Self {
        self.array_snapshot = Some(values.to_vec());
        self
    }

    pub fn indices(&mut self, indices: impl IntoIterator<Item = usize>) -> &mut Self {
        self.highlighted_indices = Some(indices.into_iter().collect());
        self
    }

    pub fn target(&mut self, target: f64) -> &mut Self {
        self.target = Some(target);
        self
    }

    pub fn found_at(&mut self, index: usize) -> &mut Self {
        self.found_index = Some(index);
        self
    }

    pub fn swapped(&mut self) -> &mut Self {
        self.swapped = true;
        self
    }

    pub fn terminal(&mut self) -> &mut Self {
        self.terminal = true;
        self
    }
}

/// Append-only step recorder used while a simulator runs.
#[derive(Debug, Default)]
pub(crate) struct StepLog {
    steps: Vec<ExecutionStep>,
}

impl StepLog {
    /// Append a step with the next index and return it for decoration.
    pub(crate) fn push(
        &mut self,
        action: impl Into<String>,
        message: impl Into<String>,
    ) -> &mut ExecutionStep {
        let index = self.steps.len();
        self.steps.push(ExecutionStep::new(index, action, message));
        &mut self.steps[index]
    }

    pub(crate) fn finish(self) -> Vec<ExecutionStep> {
        self.steps
    }
}

/// An immutable step trace together with the diagram it animates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    algorithm: String,
    steps: Vec<ExecutionStep>,
    flow_graph: FlowGraph,
}

impl Trace {
    pub(crate) fn new(algorithm: String, steps: Vec<ExecutionStep>, flow_graph: FlowGraph) -> Self {
        Self { algorithm, steps, flow_graph }
    }

    /// Display name of the algorithm this trace belongs to.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn steps(&self) -> &[ExecutionStep] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn flow_graph(&self) -> &FlowGraph {
        &self.flow_graph
    }

    /// The last step, if any.
    pub fn last(&self) -> Option<&ExecutionStep> {
        self.steps.last()
    }
}
