use crate::graph::ClusterNode;
use std::collections::{HashMap, HashSet};

/// The set of cluster nodes indexed by name.
///
/// The forest itself is a dumb container; the reconciler owns watch wiring
/// and decides when to prune. Removing a node drops it, which cancels its
/// CDS watch and any sub-watch or resolver through the RAII guards inside.
#[derive(Default)]
pub(crate) struct ClusterForest {
    nodes: HashMap<String, ClusterNode>,
}

impl ClusterForest {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&ClusterNode> {
        self.nodes.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ClusterNode> {
        self.nodes.get_mut(name)
    }

    pub(crate) fn insert(&mut self, name: String, node: ClusterNode) {
        self.nodes.insert(name, node);
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &ClusterNode)> {
        self.nodes.iter()
    }

    /// Names reachable from `roots` by following `children` edges. Only
    /// aggregate nodes carry children, so this walks the aggregate subtrees
    /// and stops at leaves. A visited set makes cycles terminate.
    pub(crate) fn reachable<'a>(&self, roots: impl Iterator<Item = &'a str>) -> HashSet<String> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack: Vec<String> = roots.map(str::to_string).collect();
        while let Some(name) = stack.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            if let Some(node) = self.nodes.get(&name) {
                for child in node.children() {
                    if !visited.contains(child) {
                        stack.push(child.clone());
                    }
                }
            }
        }
        visited
    }

    /// Remove every node not reachable from `roots`. Returns the removed
    /// names; the nodes themselves are dropped, cancelling their watches.
    pub(crate) fn prune<'a>(&mut self, roots: impl Iterator<Item = &'a str>) -> Vec<String> {
        let reachable = self.reachable(roots);
        let removed: Vec<String> = self
            .nodes
            .keys()
            .filter(|name| !reachable.contains(*name))
            .cloned()
            .collect();
        for name in &removed {
            self.nodes.remove(name);
        }
        removed
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }
}
