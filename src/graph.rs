//! Dependency graph cycle detection.
//!
//! Edges point from a task to the tasks it depends on. Ids that appear only
//! as dependencies (no entry of their own) are leaves: they are never
//! expanded and cannot close a cycle.

use std::collections::{HashMap, HashSet};

use crate::task::Task;

/// Mapping from task id to the ids it depends on.
///
/// Insertion order is kept so traversal (and therefore which cycle is
/// reported when several exist) is reproducible. Re-inserting an existing id
/// keeps the first entry.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    order: Vec<String>,
    edges: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a batch of normalized tasks.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks
            .into_iter()
            .map(|task| (task.title.clone(), task.dependencies.clone()))
            .collect()
    }

    /// Add a node. Returns false when the id was already present.
    pub fn insert(&mut self, id: impl Into<String>, dependencies: Vec<String>) -> bool {
        let id = id.into();
        if self.edges.contains_key(&id) {
            return false;
        }
        self.order.push(id.clone());
        self.edges.insert(id, dependencies);
        true
    }

    /// Outgoing edges of `id`; empty for unknown ids.
    pub fn dependencies(&self, id: &str) -> &[String] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True iff any node reaches a cycle.
    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Depth-first search from every unexplored node.
    ///
    /// Returns the first cycle found as a closed path (`[A, B, A]`; a
    /// self-loop is `[A, A]`). An edge into a node still on the path closes
    /// a cycle; an edge into a fully explored node is skipped. A node leaves
    /// the path only after all of its edges were explored.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut explored: HashSet<&str> = HashSet::new();
        let mut on_path: HashSet<&str> = HashSet::new();

        for root in &self.order {
            let root = root.as_str();
            if explored.contains(root) {
                continue;
            }

            // (node, index of the next edge to follow)
            let mut path: Vec<(&str, usize)> = vec![(root, 0)];
            on_path.insert(root);

            while let Some(frame) = path.last_mut() {
                let (node, next) = *frame;
                let dependencies = self.dependencies(node);

                if next >= dependencies.len() {
                    path.pop();
                    on_path.remove(node);
                    explored.insert(node);
                    continue;
                }

                frame.1 += 1;
                let dependency = dependencies[next].as_str();

                if on_path.contains(dependency) {
                    let start = path
                        .iter()
                        .position(|(id, _)| *id == dependency)
                        .unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|(id, _)| id.to_string()).collect();
                    cycle.push(dependency.to_string());
                    tracing::debug!(cycle = %cycle.join(" -> "), "dependency cycle found");
                    return Some(cycle);
                }

                if explored.contains(dependency) {
                    continue;
                }

                on_path.insert(dependency);
                path.push((dependency, 0));
            }
        }

        None
    }
}

impl<K, I, S> FromIterator<(K, I)> for DependencyGraph
where
    K: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut graph = DependencyGraph::new();
        for (id, dependencies) in iter {
            graph.insert(id, dependencies.into_iter().map(Into::into).collect());
        }
        graph
    }
}
