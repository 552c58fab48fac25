//! Dependency grouping
//!
//! The executor only needs an ordered sequence of groups whose members are
//! independent of one another. [`GroupComponents`] is that seam;
//! [`LinkGrouper`] is the default implementation driven by each
//! component's `links`.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use tracing::trace;

use super::model::Component;
use crate::core::errors::{Result, StagehandError};

/// Ordered groups of independent components
pub type ComponentGroups = Vec<Vec<Component>>;

/// Partitions components into dependency-ordered groups.
///
/// Group `i` may depend only on groups before it. Components inside one
/// group must not depend on each other.
pub trait GroupComponents: Send + Sync {
    fn group(&self, components: &[Component]) -> Result<ComponentGroups>;
}

impl<F> GroupComponents for F
where
    F: Fn(&[Component]) -> Result<ComponentGroups> + Send + Sync,
{
    fn group(&self, components: &[Component]) -> Result<ComponentGroups> {
        self(components)
    }
}

/// Groups components by their `links` into layers.
///
/// Each layer holds every remaining component whose links no longer point
/// at a remaining component, sorted by name. Links naming components that
/// are not in the input are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkGrouper;

impl LinkGrouper {
    pub fn new() -> Self {
        Self
    }
}

impl GroupComponents for LinkGrouper {
    fn group(&self, components: &[Component]) -> Result<ComponentGroups> {
        group_by_links(components)
    }
}

/// Group components by their links, see [`LinkGrouper`]
pub fn group_by_links(components: &[Component]) -> Result<ComponentGroups> {
    // Edges point from a dependency to the component that links to it
    let mut graph: DiGraph<&Component, ()> = DiGraph::with_capacity(components.len(), 0);
    let mut by_name: HashMap<&str, NodeIndex> = HashMap::with_capacity(components.len());

    for component in components {
        let node = graph.add_node(component);
        if by_name.insert(component.name.as_str(), node).is_some() {
            return Err(StagehandError::dependency(format!(
                "duplicate component name {:?}",
                component.name
            )));
        }
    }

    for node in graph.node_indices().collect::<Vec<_>>() {
        let component = graph[node];
        for link in &component.links {
            match by_name.get(link.as_str()) {
                Some(&dependency) => {
                    graph.add_edge(dependency, node, ());
                }
                None => trace!(
                    component = %component.name,
                    link = %link,
                    "ignoring link to unknown component"
                ),
            }
        }
    }

    let mut remaining: HashSet<NodeIndex> = graph.node_indices().collect();
    let mut groups = Vec::new();

    while !remaining.is_empty() {
        let mut layer: Vec<NodeIndex> = remaining
            .iter()
            .copied()
            .filter(|&node| {
                graph
                    .neighbors_directed(node, Direction::Incoming)
                    .all(|dependency| !remaining.contains(&dependency))
            })
            .collect();

        if layer.is_empty() {
            return Err(StagehandError::cycle(
                remaining.iter().map(|&node| graph[node].name.clone()),
            ));
        }

        layer.sort_by(|a, b| graph[*a].name.cmp(&graph[*b].name));
        for node in &layer {
            remaining.remove(node);
        }
        groups.push(layer.into_iter().map(|node| graph[node].clone()).collect());
    }

    Ok(groups)
}
