//! Cycle detection over snapshot connectivity.

use crate::snapshot::{CanvasSnapshot, EdgeRecord, NodeRecord};
use ahash::AHashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Find the first cycle reachable in the snapshot's connectivity.
///
/// Runs an iterative depth-first search with an explicit work stack and a
/// white/gray/black color map keyed by node id, so large graphs cannot
/// overflow the call stack. Edges referencing ids outside the node set are
/// ignored. Returns the cycle as a list of node ids, closed by repeating
/// the entry node; only the first discovered cycle is reported.
pub fn find_cycle(snapshot: &CanvasSnapshot) -> Option<Vec<String>> {
    find_cycle_in(&snapshot.nodes, &snapshot.connections)
}

pub fn find_cycle_in(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Option<Vec<String>> {
    let mut adjacency: AHashMap<&str, Vec<&str>> = AHashMap::new();
    for node in nodes {
        adjacency.entry(node.id.as_str()).or_default();
    }
    for edge in edges {
        if adjacency.contains_key(edge.target.as_str()) {
            if let Some(out) = adjacency.get_mut(edge.source.as_str()) {
                out.push(edge.target.as_str());
            }
        }
    }

    let mut colors: AHashMap<&str, Color> =
        nodes.iter().map(|n| (n.id.as_str(), Color::White)).collect();

    for start in nodes {
        let start = start.id.as_str();
        if colors.get(start) != Some(&Color::White) {
            continue;
        }

        // (node, index of the next neighbor to visit)
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        let mut path: Vec<&str> = vec![start];
        colors.insert(start, Color::Gray);

        while let Some(&(node, next)) = stack.last() {
            let neighbor = adjacency
                .get(node)
                .and_then(|out| out.get(next))
                .copied();
            let Some(neighbor) = neighbor else {
                colors.insert(node, Color::Black);
                stack.pop();
                path.pop();
                continue;
            };
            if let Some(frame) = stack.last_mut() {
                frame.1 += 1;
            }
            match colors.get(neighbor).copied().unwrap_or(Color::Black) {
                Color::Gray => {
                    // Back edge: the cycle is the path tail starting at the
                    // first occurrence of the target.
                    let from = path.iter().position(|&id| id == neighbor).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[from..].iter().map(|&id| id.to_owned()).collect();
                    cycle.push(neighbor.to_owned());
                    return Some(cycle);
                }
                Color::White => {
                    colors.insert(neighbor, Color::Gray);
                    stack.push((neighbor, 0));
                    path.push(neighbor);
                }
                Color::Black => {}
            }
        }
    }

    None
}
