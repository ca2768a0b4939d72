//! Built-in algorithm catalogue.
//!
//! Static metadata for every algorithm the visualizer offers: display name,
//! category, complexity, the source listing shown next to the diagram, and
//! how its flow graph is obtained.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;
use serde_json::json;
use stepviz_flow::FlowGraph;

use crate::flowchart;
use crate::input::RawInput;
use crate::step::{ExecutionStep, Trace};

/// Grouping shown in the algorithm picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sorting,
    Searching,
    Graph,
    Array,
}

impl Category {
    /// Input preloaded when an algorithm of this category is selected.
    pub fn default_input(self) -> RawInput {
        match self {
            Category::Sorting => RawInput::from("[64, 34, 25, 12, 22, 11, 90]"),
            Category::Searching => RawInput::from("23"),
            Category::Graph => RawInput::Other(json!({
                "A": ["B", "C"],
                "B": ["D", "E"],
                "C": ["F"],
                "D": [],
                "E": ["F"],
                "F": []
            })),
            Category::Array => RawInput::from(""),
        }
    }
}

/// Where a descriptor's diagram comes from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "graph", rename_all = "lowercase")]
pub enum FlowSpec {
    /// A fixed diagram
    Declarative(FlowGraph),
    /// Ask the flow-graph catalogue using the display name
    Generated,
}

/// Immutable metadata for one algorithm.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmDescriptor {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub complexity_time: String,
    pub complexity_space: String,
    pub source_text: String,
    pub flow_spec: FlowSpec,
    /// Hand-written tour of `source_text`, independent of any input
    pub walkthrough: Vec<ExecutionStep>,
}

impl AlgorithmDescriptor {
    /// Resolve the diagram for this algorithm.
    pub fn flow_graph(&self) -> FlowGraph {
        match &self.flow_spec {
            FlowSpec::Declarative(graph) => graph.clone(),
            FlowSpec::Generated => flowchart::flow_graph_for(&self.name),
        }
    }

    /// Text of a 1-based source line.
    pub fn source_line(&self, line: u32) -> Option<&str> {
        let index = usize::try_from(line).ok()?.checked_sub(1)?;
        self.source_text.lines().nth(index)
    }

    pub fn default_input(&self) -> RawInput {
        self.category.default_input()
    }

    /// The curated walkthrough as a playable trace.
    pub fn walkthrough_trace(&self) -> Trace {
        Trace::new(self.name.clone(), self.walkthrough.clone(), self.flow_graph())
    }
}

struct Entry {
    id: &'static str,
    name: &'static str,
    category: Category,
    description: &'static str,
    time: &'static str,
    space: &'static str,
    source: &'static str,
    walkthrough: &'static [Walk],
}

/// Curated walkthrough step: source line, flow node, action, message.
type Walk = (u32, &'static str, &'static str, &'static str);

const ENTRIES: &[Entry] = &[
    Entry {
        id: "bubble-sort",
        name: "Bubble Sort",
        category: Category::Sorting,
        description: "Repeatedly steps through the list, swapping adjacent elements that are out of order.",
        time: "O(n²)",
        space: "O(1)",
        source: BUBBLE_SORT_SOURCE,
        walkthrough: BUBBLE_SORT_WALK,
    },
    Entry {
        id: "quick-sort",
        name: "Quick Sort",
        category: Category::Sorting,
        description: "Divide and conquer: partition around a pivot, then sort each side.",
        time: "O(n log n) average",
        space: "O(log n)",
        source: QUICK_SORT_SOURCE,
        walkthrough: QUICK_SORT_WALK,
    },
    Entry {
        id: "merge-sort",
        name: "Merge Sort",
        category: Category::Sorting,
        description: "Stable divide and conquer: split in halves, sort each, merge them back in order.",
        time: "O(n log n)",
        space: "O(n)",
        source: MERGE_SORT_SOURCE,
        walkthrough: MERGE_SORT_WALK,
    },
    Entry {
        id: "binary-search",
        name: "Binary Search",
        category: Category::Searching,
        description: "Finds a target in a sorted array by halving the search range each step.",
        time: "O(log n)",
        space: "O(1)",
        source: BINARY_SEARCH_SOURCE,
        walkthrough: BINARY_SEARCH_WALK,
    },
    Entry {
        id: "linear-search",
        name: "Linear Search",
        category: Category::Searching,
        description: "Checks each element in turn until the target is found.",
        time: "O(n)",
        space: "O(1)",
        source: LINEAR_SEARCH_SOURCE,
        walkthrough: LINEAR_SEARCH_WALK,
    },
    Entry {
        id: "dijkstra",
        name: "Dijkstra's Algorithm",
        category: Category::Graph,
        description: "Shortest paths from one node in a graph with non-negative edge weights.",
        time: "O(V²)",
        space: "O(V)",
        source: DIJKSTRA_SOURCE,
        walkthrough: DIJKSTRA_WALK,
    },
    Entry {
        id: "bfs",
        name: "BFS",
        category: Category::Graph,
        description: "Breadth-first traversal, level by level, driven by a queue.",
        time: "O(V + E)",
        space: "O(V)",
        source: BFS_SOURCE,
        walkthrough: BFS_WALK,
    },
    Entry {
        id: "dfs",
        name: "DFS",
        category: Category::Graph,
        description: "Depth-first traversal, going as deep as possible before backtracking.",
        time: "O(V + E)",
        space: "O(V)",
        source: DFS_SOURCE,
        walkthrough: DFS_WALK,
    },
    Entry {
        id: "two-sum",
        name: "Two Sum",
        category: Category::Array,
        description: "Finds two numbers that add up to a target using a hash map of complements.",
        time: "O(n)",
        space: "O(n)",
        source: TWO_SUM_SOURCE,
        walkthrough: TWO_SUM_WALK,
    },
];

fn walkthrough(walk: &[Walk]) -> Vec<ExecutionStep> {
    let mut steps: Vec<_> = walk
        .iter()
        .enumerate()
        .map(|(index, &(line, node, action, message))| {
            let mut step = ExecutionStep::new(index, action, message);
            step.line(line).node(node);
            step
        })
        .collect();
    if let Some(last) = steps.last_mut() {
        last.terminal();
    }
    steps
}

fn descriptors() -> &'static [AlgorithmDescriptor] {
    static CATALOGUE: OnceLock<Vec<AlgorithmDescriptor>> = OnceLock::new();
    CATALOGUE.get_or_init(|| {
        ENTRIES
            .iter()
            .map(|e| AlgorithmDescriptor {
                id: e.id.to_owned(),
                name: e.name.to_owned(),
                category: e.category,
                description: e.description.to_owned(),
                complexity_time: e.time.to_owned(),
                complexity_space: e.space.to_owned(),
                source_text: e.source.to_owned(),
                flow_spec: FlowSpec::Generated,
                walkthrough: walkthrough(e.walkthrough),
            })
            .collect()
    })
}

/// Every descriptor, in catalogue order.
pub fn all() -> &'static [AlgorithmDescriptor] {
    descriptors()
}

/// Look up a descriptor by exact id.
pub fn find(id: &str) -> Option<&'static AlgorithmDescriptor> {
    descriptors().iter().find(|d| d.id == id)
}

/// Look up a descriptor by display name, ignoring case.
pub fn find_by_name(name: &str) -> Option<&'static AlgorithmDescriptor> {
    descriptors().iter().find(|d| d.name.eq_ignore_ascii_case(name))
}

/// Look up by id, then display name, then a normalized id
/// (`Bubble_Sort` → `bubble-sort`).
pub fn lookup(key: &str) -> Option<&'static AlgorithmDescriptor> {
    find(key)
        .or_else(|| find_by_name(key))
        .or_else(|| find(&normalize_id(key)))
}

/// Lowercase, with spaces and underscores turned into hyphens.
pub fn normalize_id(key: &str) -> String {
    key.trim()
        .chars()
        .map(|c| match c {
            ' ' | '_' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// The whole catalogue grouped by category.
pub fn grouped() -> BTreeMap<Category, Vec<&'static AlgorithmDescriptor>> {
    let mut groups: BTreeMap<Category, Vec<&'static AlgorithmDescriptor>> = BTreeMap::new();
    for descriptor in descriptors() {
        groups.entry(descriptor.category).or_default().push(descriptor);
    }
    groups
}

pub(crate) const BUBBLE_SORT_SOURCE: &str = "\
def bubble_sort(arr):
    n = len(arr)
    for i in range(n - 1):
        swapped = False
        for j in range(n - i - 1):
            if arr[j] > arr[j + 1]:
                arr[j], arr[j + 1] = arr[j + 1], arr[j]
                swapped = True
        if not swapped:
            break
    return arr

print(bubble_sort([64, 34, 25, 12, 22, 11, 90]))";

pub(crate) const BINARY_SEARCH_SOURCE: &str = "\
def binary_search(arr, target):
    low, high = 0, len(arr) - 1
    while low <= high:
        mid = (low + high) // 2
        if arr[mid] == target:
            return mid
        elif arr[mid] < target:
            low = mid + 1
        else:
            high = mid - 1
    return -1

print(binary_search([2, 5, 8, 12, 16, 23, 38, 45, 67, 77], 23))";

const QUICK_SORT_SOURCE: &str = "\
def quick_sort(arr, low, high):
    if low < high:
        p = partition(arr, low, high)
        quick_sort(arr, low, p - 1)
        quick_sort(arr, p + 1, high)

def partition(arr, low, high):
    pivot = arr[high]
    i = low - 1
    for j in range(low, high):
        if arr[j] <= pivot:
            i += 1
            arr[i], arr[j] = arr[j], arr[i]
    arr[i + 1], arr[high] = arr[high], arr[i + 1]
    return i + 1";

const MERGE_SORT_SOURCE: &str = "\
def merge_sort(arr):
    if len(arr) <= 1:
        return arr
    mid = len(arr) // 2
    left = merge_sort(arr[:mid])
    right = merge_sort(arr[mid:])
    return merge(left, right)

def merge(left, right):
    out, i, j = [], 0, 0
    while i < len(left) and j < len(right):
        if left[i] <= right[j]:
            out.append(left[i]); i += 1
        else:
            out.append(right[j]); j += 1
    return out + left[i:] + right[j:]";

const LINEAR_SEARCH_SOURCE: &str = "\
def linear_search(arr, target):
    for i in range(len(arr)):
        if arr[i] == target:
            return i
    return -1";

const DIJKSTRA_SOURCE: &str = "\
import heapq

def dijkstra(graph, source):
    dist = {node: float('inf') for node in graph}
    dist[source] = 0
    heap = [(0, source)]
    while heap:
        d, node = heapq.heappop(heap)
        if d > dist[node]:
            continue
        for neighbor, weight in graph[node]:
            if d + weight < dist[neighbor]:
                dist[neighbor] = d + weight
                heapq.heappush(heap, (dist[neighbor], neighbor))
    return dist";

const BFS_SOURCE: &str = "\
from collections import deque

def bfs(graph, start):
    queue, seen, order = deque([start]), {start}, []
    while queue:
        node = queue.popleft()
        order.append(node)
        for neighbor in graph.get(node, []):
            if neighbor not in seen:
                seen.add(neighbor)
                queue.append(neighbor)
    return order";

const DFS_SOURCE: &str = "\
def dfs(graph, start):
    stack, seen, order = [start], set(), []
    while stack:
        node = stack.pop()
        if node in seen:
            continue
        seen.add(node)
        order.append(node)
        for neighbor in reversed(graph.get(node, [])):
            if neighbor not in seen:
                stack.append(neighbor)
    return order";

const TWO_SUM_SOURCE: &str = "\
def two_sum(nums, target):
    seen = {}
    for i, num in enumerate(nums):
        complement = target - num
        if complement in seen:
            return [seen[complement], i]
        seen[num] = i
    return []";

const BUBBLE_SORT_WALK: &[Walk] = &[
    (2, "input", "Initialize", "Get array length: n = 7"),
    (3, "outer", "Outer Loop Start", "Outer loop: i = 0 (first pass)"),
    (4, "outer", "Reset Flag", "Set swapped = False"),
    (5, "inner", "Inner Loop Start", "Inner loop: j = 0, comparing arr[0] and arr[1]"),
    (6, "compare", "Compare", "Comparing: 64 > 34? Yes, swap needed"),
    (7, "swap", "Swap", "Swapped: [34, 64, 25, 12, 22, 11, 90]"),
    (8, "swap", "Set Flag", "Set swapped = True"),
    (5, "next", "Next Iteration", "j = 1, comparing arr[1] and arr[2]"),
    (6, "compare", "Compare", "Comparing: 64 > 25? Yes, swap needed"),
    (7, "swap", "Swap", "Swapped: [34, 25, 64, 12, 22, 11, 90]"),
    (9, "early", "Check Flag", "swapped = True, continue"),
    (3, "outer", "Outer Loop Next", "i = 1 (second pass)"),
    (5, "inner", "Inner Loop Start", "Inner loop: j = 0"),
    (9, "early", "Final Check", "No swaps in this pass, array is sorted!"),
    (10, "early", "Break", "Break from loop - sorting complete"),
    (11, "end", "Return", "Return sorted array: [11, 12, 22, 25, 34, 64, 90]"),
];

const BINARY_SEARCH_WALK: &[Walk] = &[
    (2, "init", "Initialize", "Set left and right boundaries"),
    (3, "loop", "Loop Check", "Check if search space is valid"),
    (4, "mid", "Calculate Mid", "Find middle index"),
    (5, "check", "Check Match", "Compare middle element with target"),
    (8, "greater", "Update Left", "Search in right half"),
    (10, "smaller", "Update Right", "Search in left half"),
    (11, "notfound", "Not Found", "Return -1 when the range is empty"),
];

const QUICK_SORT_WALK: &[Walk] = &[
    (2, "base", "Base Case", "Check if subarray has more than one element"),
    (8, "pivot", "Choose Pivot", "Take the last element as the pivot"),
    (3, "partition", "Partition", "Partition array and get pivot index"),
    (4, "left", "Recurse Left", "Sort left subarray recursively"),
    (5, "right", "Recurse Right", "Sort right subarray recursively"),
];

const MERGE_SORT_WALK: &[Walk] = &[
    (2, "base", "Base Case", "Check if array has one or zero elements"),
    (4, "mid", "Divide", "Split array into two halves"),
    (5, "left", "Recurse Left", "Sort left half recursively"),
    (6, "right", "Recurse Right", "Sort right half recursively"),
    (7, "merge", "Merge", "Merge sorted halves"),
];

const LINEAR_SEARCH_WALK: &[Walk] = &[
    (2, "loop", "Loop Start", "Start iterating through array"),
    (3, "check", "Compare", "Check if current element matches target"),
    (4, "found", "Found", "Return index if match found"),
    (2, "increment", "Increment", "Move to next element"),
    (5, "notfound", "Not Found", "Return -1 after the last element"),
];

const DIJKSTRA_WALK: &[Walk] = &[
    (4, "init", "Initialize", "Set every distance to infinity"),
    (5, "init", "Source", "Distance to the source is 0"),
    (7, "check", "Loop", "Process nodes until the heap is empty"),
    (8, "select", "Pop Closest", "Take the closest node off the heap"),
    (9, "mark", "Skip Stale", "Ignore entries longer than the known distance"),
    (12, "update", "Relax", "Check if the path through this node is shorter"),
    (14, "update", "Push", "Queue the neighbor with its new distance"),
    (15, "end", "Return", "Return the shortest distances"),
];

const BFS_WALK: &[Walk] = &[
    (4, "init", "Initialize", "Create queue and visited set"),
    (5, "loop", "Loop", "Process nodes until queue is empty"),
    (6, "dequeue", "Dequeue", "Remove node from queue"),
    (8, "visit", "Check Neighbors", "Visit all unvisited neighbors"),
    (11, "enqueue", "Enqueue", "Add unvisited neighbors to queue"),
];

const DFS_WALK: &[Walk] = &[
    (2, "init", "Initialize", "Create stack and visited set"),
    (3, "loop", "Loop", "Process nodes until stack is empty"),
    (4, "pop", "Pop", "Remove node from stack"),
    (7, "visit", "Mark Visited", "Mark current node as visited"),
    (11, "push", "Push Neighbors", "Add unvisited neighbors to stack"),
];

const TWO_SUM_WALK: &[Walk] = &[
    (2, "init", "Initialize", "Create an empty map of seen numbers"),
    (3, "loop", "Loop", "Walk the array with its indices"),
    (4, "loop", "Complement", "Compute complement = target - num"),
    (5, "check", "Lookup", "Check if the complement was seen before"),
    (7, "add", "Remember", "Store num with its index"),
    (6, "found", "Found", "Return the two indices"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_nine_unique_ids() {
        let mut ids: Vec<_> = all().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), 9);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn find_by_id_and_name() {
        assert_eq!(find("binary-search").unwrap().name, "Binary Search");
        assert_eq!(find_by_name("two sum").unwrap().id, "two-sum");
        assert!(find("foo-sort").is_none());
        assert!(find_by_name("Foo Sort").is_none());
    }

    #[test]
    fn lookup_accepts_loose_keys() {
        assert_eq!(lookup("Bubble_Sort").unwrap().id, "bubble-sort");
        assert_eq!(lookup("BFS").unwrap().id, "bfs");
        assert_eq!(lookup("dijkstra's algorithm").unwrap().id, "dijkstra");
        assert!(lookup("foo-sort").is_none());
    }

    #[test]
    fn grouping_preserves_catalogue_order() {
        let groups = grouped();
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(
            keys,
            [Category::Sorting, Category::Searching, Category::Graph, Category::Array]
        );

        let sorting: Vec<_> = groups[&Category::Sorting].iter().map(|d| d.id.as_str()).collect();
        assert_eq!(sorting, ["bubble-sort", "quick-sort", "merge-sort"]);
        assert_eq!(groups[&Category::Array].len(), 1);
    }

    #[test]
    fn every_descriptor_has_a_specific_diagram() {
        for descriptor in all() {
            assert!(
                flowchart::pattern_for(&descriptor.name).is_some(),
                "{} falls through to the generic diagram",
                descriptor.name
            );
        }
    }

    #[test]
    fn declarative_spec_is_returned_verbatim() {
        let mut descriptor = find("bfs").unwrap().clone();
        let custom = flowchart::generic("Custom");
        descriptor.flow_spec = FlowSpec::Declarative(custom.clone());
        assert_eq!(descriptor.flow_graph(), custom);
    }

    #[test]
    fn source_lines_are_one_based() {
        let bubble = find("bubble-sort").unwrap();
        assert_eq!(bubble.source_line(1), Some("def bubble_sort(arr):"));
        assert_eq!(bubble.source_line(0), None);
        assert_eq!(bubble.source_line(500), None);
    }

    #[test]
    fn default_inputs_by_category() {
        assert_eq!(Category::Sorting.default_input().normalize().values.len(), 7);
        assert_eq!(Category::Searching.default_input().normalize().lone_number(), Some(23.0));
        assert!(matches!(Category::Graph.default_input(), RawInput::Other(_)));
    }

    #[test]
    fn descriptor_serializes_camel_case() {
        let json = serde_json::to_value(find("merge-sort").unwrap()).unwrap();
        assert_eq!(json["complexityTime"], "O(n log n)");
        assert_eq!(json["category"], "sorting");
        assert_eq!(json["flowSpec"]["kind"], "generated");
        assert_eq!(json["walkthrough"][0]["action"], "Base Case");
        assert_eq!(json["walkthrough"][0]["sourceLine"], 2);
    }

    fn line(source: &str, line: u32) -> &str {
        source.lines().nth(line as usize - 1).unwrap().trim()
    }

    #[test]
    fn walkthrough_lines_fall_inside_listing() {
        for descriptor in all() {
            assert!(!descriptor.walkthrough.is_empty(), "{}", descriptor.id);
            let lines = descriptor.source_text.lines().count() as u32;
            for step in &descriptor.walkthrough {
                let at = step.source_line.unwrap();
                assert!((1..=lines).contains(&at), "{} line {at}", descriptor.id);
                assert!(!line(&descriptor.source_text, at).is_empty(), "{} line {at}", descriptor.id);
            }
        }

        let merge = find("merge-sort").unwrap();
        let merge_line = merge.walkthrough[4].source_line.unwrap();
        assert_eq!(line(&merge.source_text, merge_line), "return merge(left, right)");
        let bfs = find("bfs").unwrap();
        let dequeue_line = bfs.walkthrough[2].source_line.unwrap();
        assert_eq!(line(&bfs.source_text, dequeue_line), "node = queue.popleft()");
    }

    #[test]
    fn walkthrough_nodes_exist_in_diagram() {
        for descriptor in all() {
            let graph = descriptor.flow_graph();
            for step in &descriptor.walkthrough {
                let node = step.flow_node.as_ref().unwrap();
                assert!(graph.contains(node.as_str()), "{}: {node}", descriptor.id);
            }
        }
    }

    #[test]
    fn walkthrough_trace_ends_on_terminal_step() {
        let trace = find("dfs").unwrap().walkthrough_trace();
        assert_eq!(trace.algorithm(), "DFS");
        let indices: Vec<_> = trace.steps().iter().map(|s| s.index).collect();
        assert_eq!(indices, [0, 1, 2, 3, 4]);
        assert!(trace.last().unwrap().terminal);
        assert_eq!(trace.steps().iter().filter(|s| s.terminal).count(), 1);
    }
}
