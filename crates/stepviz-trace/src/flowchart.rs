//! Flow-graph catalogue keyed by algorithm display name.
//!
//! Patterns are checked in [`FLOW_PATTERNS`] order and the first one whose
//! keyword appears in the lowercased name wins. Names that match nothing
//! get the generic five-node diagram. The order matters: a name can contain
//! keywords of more than one pattern.

use stepviz_flow::{FlowEdge, FlowGraph, FlowNode, NodeKind};

/// One catalogue entry.
pub struct FlowPattern {
    /// Short name used in logs and tests
    pub name: &'static str,
    /// Lowercase substrings, any of which selects this pattern
    pub keywords: &'static [&'static str],
    build: fn() -> FlowGraph,
}

impl FlowPattern {
    /// Check the pattern against a lowercased name.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }

    /// Build a fresh copy of the diagram.
    pub fn build(&self) -> FlowGraph {
        (self.build)()
    }
}

/// The catalogue, in match order.
pub static FLOW_PATTERNS: &[FlowPattern] = &[
    FlowPattern { name: "bubble-sort", keywords: &["bubble sort", "bubblesort"], build: bubble_sort },
    FlowPattern { name: "binary-search", keywords: &["binary search", "binarysearch"], build: binary_search },
    FlowPattern { name: "quick-sort", keywords: &["quick sort", "quicksort"], build: quick_sort },
    FlowPattern { name: "merge-sort", keywords: &["merge sort", "mergesort"], build: merge_sort },
    FlowPattern { name: "linear-search", keywords: &["linear search", "linearsearch"], build: linear_search },
    FlowPattern { name: "dijkstra", keywords: &["dijkstra"], build: dijkstra },
    FlowPattern { name: "bfs", keywords: &["bfs"], build: bfs },
    FlowPattern { name: "dfs", keywords: &["dfs"], build: dfs },
    FlowPattern { name: "two-sum", keywords: &["two sum", "twosum"], build: two_sum },
];

/// Find the first pattern matching a display name.
pub fn pattern_for(name: &str) -> Option<&'static FlowPattern> {
    let lowered = name.to_lowercase();
    FLOW_PATTERNS.iter().find(|p| p.matches(&lowered))
}

/// Build the diagram for an algorithm display name.
pub fn flow_graph_for(name: &str) -> FlowGraph {
    match pattern_for(name) {
        Some(pattern) => pattern.build(),
        None => generic(name),
    }
}

/// `Start → Process Input → <name> → Return Result → End`.
pub fn generic(name: &str) -> FlowGraph {
    FlowGraph::new(
        vec![
            start(300.0, 50.0),
            process("process", "Process Input", 300.0, 130.0),
            process("algorithm", name, 300.0, 210.0),
            process("result", "Return Result", 300.0, 290.0),
            end("end", "End", 300.0, 370.0),
        ],
        vec![
            edge("start", "process"),
            edge("process", "algorithm"),
            edge("algorithm", "result"),
            edge("result", "end"),
        ],
    )
}

fn start(x: f64, y: f64) -> FlowNode {
    FlowNode::new("start", "Start", NodeKind::Start).at(x, y)
}

fn end(id: &str, label: &str, x: f64, y: f64) -> FlowNode {
    FlowNode::new(id, label, NodeKind::End).at(x, y)
}

fn process(id: &str, label: &str, x: f64, y: f64) -> FlowNode {
    FlowNode::new(id, label, NodeKind::Process).at(x, y)
}

fn decision(id: &str, label: &str, x: f64, y: f64) -> FlowNode {
    FlowNode::new(id, label, NodeKind::Decision).at(x, y)
}

fn edge(from: &str, to: &str) -> FlowEdge {
    FlowEdge::new(from, to)
}

fn branch(from: &str, to: &str, label: &str) -> FlowEdge {
    FlowEdge::new(from, to).labelled(label)
}

// The early-exit path ("no swaps, stop") is drawn here but never emitted as
// a step; the diagram is illustrative.
fn bubble_sort() -> FlowGraph {
    FlowGraph::new(
        vec![
            start(300.0, 50.0),
            process("input", "Read Array", 300.0, 130.0),
            process("outer", "i = 0 to n-2", 300.0, 210.0),
            process("inner", "j = 0 to n-i-2", 300.0, 290.0),
            decision("early", "Any swap this pass?", 480.0, 290.0),
            decision("compare", "arr[j] > arr[j+1]?", 300.0, 370.0),
            process("swap", "Swap arr[j] & arr[j+1]", 150.0, 450.0),
            process("continue", "Continue", 450.0, 450.0),
            process("next", "Next iteration", 300.0, 530.0),
            end("end", "End (Sorted)", 300.0, 610.0),
        ],
        vec![
            edge("start", "input"),
            edge("input", "outer"),
            edge("outer", "inner"),
            edge("inner", "compare"),
            branch("compare", "swap", "Yes"),
            branch("compare", "continue", "No"),
            edge("swap", "continue"),
            edge("continue", "next"),
            edge("next", "compare"),
            branch("inner", "early", "Pass done"),
            branch("early", "outer", "Yes"),
            branch("early", "end", "No"),
            edge("outer", "end"),
        ],
    )
}

fn binary_search() -> FlowGraph {
    FlowGraph::new(
        vec![
            start(300.0, 50.0),
            process("init", "low=0, high=n-1", 300.0, 130.0),
            decision("loop", "low <= high?", 300.0, 210.0),
            process("mid", "mid = (low+high)/2", 300.0, 290.0),
            decision("check", "arr[mid] == target?", 300.0, 370.0),
            process("found", "Found at mid", 150.0, 450.0),
            process("greater", "target > arr[mid]", 450.0, 450.0),
            process("smaller", "target < arr[mid]", 300.0, 530.0),
            process("update", "Update low/high", 300.0, 610.0),
            process("notfound", "Not Found", 150.0, 690.0),
            end("end", "End", 300.0, 770.0),
        ],
        vec![
            edge("start", "init"),
            edge("init", "loop"),
            branch("loop", "mid", "Yes"),
            branch("loop", "notfound", "No"),
            edge("mid", "check"),
            branch("check", "found", "Yes"),
            branch("check", "greater", "target > arr[mid]"),
            branch("check", "smaller", "target < arr[mid]"),
            edge("greater", "update"),
            edge("smaller", "update"),
            edge("update", "loop"),
            edge("found", "end"),
            edge("notfound", "end"),
        ],
    )
}

fn quick_sort() -> FlowGraph {
    FlowGraph::new(
        vec![
            start(300.0, 50.0),
            decision("base", "Is array length <= 1?", 300.0, 130.0),
            process("pivot", "Choose pivot", 300.0, 210.0),
            process("partition", "Partition array", 300.0, 290.0),
            process("left", "QuickSort left", 150.0, 370.0),
            process("right", "QuickSort right", 450.0, 370.0),
            end("end", "End (Sorted)", 300.0, 450.0),
        ],
        vec![
            edge("start", "base"),
            branch("base", "end", "Yes"),
            branch("base", "pivot", "No"),
            edge("pivot", "partition"),
            edge("partition", "left"),
            edge("left", "right"),
            edge("right", "end"),
        ],
    )
}

fn merge_sort() -> FlowGraph {
    FlowGraph::new(
        vec![
            start(300.0, 50.0),
            decision("base", "Is array length <= 1?", 300.0, 130.0),
            process("mid", "mid = n/2", 300.0, 210.0),
            process("left", "MergeSort left half", 150.0, 290.0),
            process("right", "MergeSort right half", 450.0, 290.0),
            process("merge", "Merge both halves", 300.0, 370.0),
            end("end", "End (Sorted)", 300.0, 450.0),
        ],
        vec![
            edge("start", "base"),
            branch("base", "end", "Yes"),
            branch("base", "mid", "No"),
            edge("mid", "left"),
            edge("left", "right"),
            edge("right", "merge"),
            edge("merge", "end"),
        ],
    )
}

fn linear_search() -> FlowGraph {
    FlowGraph::new(
        vec![
            start(300.0, 50.0),
            process("init", "i = 0", 300.0, 130.0),
            decision("loop", "i < n?", 300.0, 210.0),
            decision("check", "arr[i] == target?", 300.0, 290.0),
            process("found", "Found at i", 150.0, 370.0),
            process("increment", "i++", 450.0, 370.0),
            process("notfound", "Not Found", 300.0, 450.0),
            end("end", "End", 300.0, 530.0),
        ],
        vec![
            edge("start", "init"),
            edge("init", "loop"),
            branch("loop", "check", "Yes"),
            branch("loop", "notfound", "No"),
            branch("check", "found", "Yes"),
            branch("check", "increment", "No"),
            edge("increment", "loop"),
            edge("found", "end"),
            edge("notfound", "end"),
        ],
    )
}

fn dijkstra() -> FlowGraph {
    FlowGraph::new(
        vec![
            start(300.0, 50.0),
            process("init", "Initialize distances", 300.0, 130.0),
            process("select", "Select unvisited node", 300.0, 210.0),
            decision("check", "Any unvisited?", 300.0, 290.0),
            process("update", "Update distances", 300.0, 370.0),
            process("mark", "Mark as visited", 300.0, 450.0),
            end("end", "End", 300.0, 530.0),
        ],
        vec![
            edge("start", "init"),
            edge("init", "select"),
            edge("select", "check"),
            branch("check", "update", "Yes"),
            branch("check", "end", "No"),
            edge("update", "mark"),
            edge("mark", "select"),
        ],
    )
}

/// Shared shape of the two traversal diagrams.
fn traversal(init: &str, empty: &str, take: (&str, &str), put: (&str, &str)) -> FlowGraph {
    FlowGraph::new(
        vec![
            start(300.0, 50.0),
            process("init", init, 300.0, 130.0),
            decision("loop", empty, 300.0, 210.0),
            process(take.0, take.1, 300.0, 290.0),
            process("visit", "Visit neighbors", 300.0, 370.0),
            process(put.0, put.1, 300.0, 450.0),
            end("end", "End", 300.0, 530.0),
        ],
        vec![
            edge("start", "init"),
            edge("init", "loop"),
            branch("loop", take.0, "No"),
            branch("loop", "end", "Yes"),
            edge(take.0, "visit"),
            edge("visit", put.0),
            edge(put.0, "loop"),
        ],
    )
}

fn bfs() -> FlowGraph {
    traversal(
        "Create queue, add start",
        "Queue empty?",
        ("dequeue", "Dequeue node"),
        ("enqueue", "Enqueue unvisited"),
    )
}

fn dfs() -> FlowGraph {
    traversal(
        "Create stack, add start",
        "Stack empty?",
        ("pop", "Pop node"),
        ("push", "Push unvisited"),
    )
}

fn two_sum() -> FlowGraph {
    FlowGraph::new(
        vec![
            start(300.0, 50.0),
            process("init", "Create hash map", 300.0, 130.0),
            process("loop", "For each num in array", 300.0, 210.0),
            decision("check", "complement in map?", 300.0, 290.0),
            process("found", "Return indices", 150.0, 370.0),
            process("add", "Add num to map", 450.0, 370.0),
            process("continue", "Continue loop", 300.0, 450.0),
            process("notfound", "Not found", 300.0, 530.0),
            end("end", "End", 300.0, 610.0),
        ],
        vec![
            edge("start", "init"),
            edge("init", "loop"),
            edge("loop", "check"),
            branch("check", "found", "Yes"),
            branch("check", "add", "No"),
            edge("add", "continue"),
            edge("continue", "loop"),
            edge("found", "end"),
            edge("loop", "notfound"),
            edge("notfound", "end"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(name: &str) -> Option<&'static str> {
        pattern_for(name).map(|p| p.name)
    }

    #[test]
    fn display_names_resolve() {
        assert_eq!(resolved("Bubble Sort"), Some("bubble-sort"));
        assert_eq!(resolved("BINARY SEARCH"), Some("binary-search"));
        assert_eq!(resolved("QuickSort"), Some("quick-sort"));
        assert_eq!(resolved("Merge Sort"), Some("merge-sort"));
        assert_eq!(resolved("Linear Search"), Some("linear-search"));
        assert_eq!(resolved("Dijkstra's Algorithm"), Some("dijkstra"));
        assert_eq!(resolved("BFS"), Some("bfs"));
        assert_eq!(resolved("DFS"), Some("dfs"));
        assert_eq!(resolved("Two Sum"), Some("two-sum"));
        assert_eq!(resolved("foo-sort"), None);
    }

    #[test]
    fn first_match_wins() {
        // Both "bubble sort" and "binary search" appear; bubble is checked first.
        assert_eq!(resolved("binary search after bubble sort"), Some("bubble-sort"));
        assert_eq!(resolved("bfs then dfs"), Some("bfs"));
    }

    #[test]
    fn generic_diagram_names_the_algorithm() {
        let graph = flow_graph_for("Heap Sort");
        let labels: Vec<_> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, ["Start", "Process Input", "Heap Sort", "Return Result", "End"]);
        assert_eq!(graph.edges.len(), 4);
    }

    #[test]
    fn every_catalogue_edge_resolves() {
        for pattern in FLOW_PATTERNS {
            let graph = pattern.build();
            for e in &graph.edges {
                assert!(graph.contains(e.from.as_str()), "{}: {}", pattern.name, e.from);
                assert!(graph.contains(e.to.as_str()), "{}: {}", pattern.name, e.to);
            }
            assert!(graph.nodes.iter().all(|n| n.position.is_some()));
            assert!(graph.contains("start") && graph.contains("end"), "{}", pattern.name);
        }
    }

    #[test]
    fn bubble_diagram_has_labelled_branches() {
        let graph = flow_graph_for("Bubble Sort");
        let labelled: Vec<_> = graph
            .edges
            .iter()
            .filter_map(|e| e.label.as_deref())
            .collect();
        assert_eq!(labelled, ["Yes", "No", "Pass done", "Yes", "No"]);
        assert_eq!(graph.node("compare").unwrap().kind, NodeKind::Decision);
    }
}
