//! Relationship graph and relevance selection.
//!
//! Relationships are resolved once per pass into [`Link`]s between table
//! indices. Links whose table or column no longer exists are dropped here,
//! so everything downstream can assume both ends resolve.

use std::collections::BTreeSet;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::{Bfs, VisitMap};

use crate::model::{Column, QueryModel, Relationship};

/// A relationship whose endpoints both resolved.
#[derive(Debug, Clone, Copy)]
pub struct Link<'a> {
    pub relationship: &'a Relationship,
    /// Position of the relationship in the model's list.
    pub order: usize,
    /// Index of the source table in `QueryModel::tables`.
    pub source: usize,
    pub source_column: &'a Column,
    /// Index of the target table in `QueryModel::tables`.
    pub target: usize,
    pub target_column: &'a Column,
}

impl Link<'_> {
    /// The endpoint opposite `table`, if `table` is an endpoint.
    pub fn other_end(&self, table: usize) -> Option<usize> {
        if self.source == table {
            Some(self.target)
        } else if self.target == table {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Undirected view of the canvas relationships.
///
/// Node `i` is table `i` of the model; edge weights index into `links`.
pub struct TableGraph<'a> {
    links: Vec<Link<'a>>,
    graph: UnGraph<usize, usize>,
}

impl<'a> TableGraph<'a> {
    pub fn build(model: &'a QueryModel) -> Self {
        let mut graph = UnGraph::with_capacity(model.tables.len(), model.relationships.len());
        for idx in 0..model.tables.len() {
            graph.add_node(idx);
        }

        let mut links = Vec::new();
        for (order, rel) in model.relationships.iter().enumerate() {
            let Some(link) = resolve(model, order, rel) else {
                log::warn!("skipping relationship {}: dangling table or column", rel.id);
                continue;
            };
            graph.add_edge(
                NodeIndex::new(link.source),
                NodeIndex::new(link.target),
                links.len(),
            );
            links.push(link);
        }

        Self { links, graph }
    }

    pub fn links(&self) -> &[Link<'a>] {
        &self.links
    }

    pub fn link(&self, idx: usize) -> &Link<'a> {
        &self.links[idx]
    }

    /// Link indices touching `table`, in no particular order.
    pub fn links_of(&self, table: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .edges(NodeIndex::new(table))
            .map(|edge| *edge.weight())
    }

    /// Number of links declared with `table` as their source.
    pub fn outgoing(&self, table: usize) -> usize {
        self.links.iter().filter(|l| l.source == table).count()
    }

    /// Seeds plus every table reachable from them, treating relationships
    /// as undirected.
    pub fn relevant(&self, seeds: impl IntoIterator<Item = usize>) -> BTreeSet<usize> {
        let mut seeds = seeds
            .into_iter()
            .filter(|&seed| seed < self.graph.node_count())
            .map(NodeIndex::new);
        let Some(first) = seeds.next() else {
            return BTreeSet::new();
        };

        let mut bfs = Bfs::new(&self.graph, first);
        for seed in seeds {
            if bfs.discovered.visit(seed) {
                bfs.stack.push_back(seed);
            }
        }

        let mut relevant = BTreeSet::new();
        while let Some(node) = bfs.next(&self.graph) {
            relevant.insert(self.graph[node]);
        }
        relevant
    }
}

fn resolve<'a>(model: &'a QueryModel, order: usize, rel: &'a Relationship) -> Option<Link<'a>> {
    let source = model.tables.iter().position(|t| t.id == rel.source_table_id)?;
    let target = model.tables.iter().position(|t| t.id == rel.target_table_id)?;
    let source_column = model.tables[source].column(&rel.source_column_id)?;
    let target_column = model.tables[target].column(&rel.target_column_id)?;

    Some(Link {
        relationship: rel,
        order,
        source,
        source_column,
        target,
        target_column,
    })
}

/// Indices of tables with at least one selected column.
pub fn selected_tables(model: &QueryModel) -> Vec<usize> {
    model
        .tables
        .iter()
        .enumerate()
        .filter(|(_, t)| t.selected_count() > 0)
        .map(|(idx, _)| idx)
        .collect()
}

/// Tables relevant to a plain SELECT: those with selected columns plus
/// everything connected to them.
pub fn relevant_tables(model: &QueryModel, graph: &TableGraph<'_>) -> BTreeSet<usize> {
    graph.relevant(selected_tables(model))
}
