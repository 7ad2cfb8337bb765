//! Join planning: choose the FROM table and walk the relationship graph.
//!
//! The walk is depth-first from the root. Each placed table is joined
//! exactly once; a link whose far table is already placed is dropped, so
//! cyclic canvases produce a spanning tree instead of redundant predicates.

use std::collections::{BTreeSet, HashSet};

use crate::model::{JoinKind, QueryModel};
use crate::sql::{table_col, Expr, ExprExt, JoinType, Query, TableRef};

use super::alias::AliasAllocator;
use super::error::{GenerateError, GenerateResult};
use super::relevance::TableGraph;

/// One JOIN: the table it places and the link that connects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinStep {
    pub table: usize,
    pub link: usize,
}

/// Result of walking the relevant part of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPlan {
    pub root: usize,
    pub steps: Vec<JoinStep>,
    /// Relevant tables the walk never reached, in input order.
    pub omitted: Vec<usize>,
}

impl JoinPlan {
    /// Plan joins over `relevant`. `None` when there is nothing to plan.
    pub fn build(
        model: &QueryModel,
        graph: &TableGraph<'_>,
        relevant: &BTreeSet<usize>,
    ) -> Option<Self> {
        let root = choose_root(model, graph, relevant)?;
        log::debug!("root table: {}", model.tables[root].name);

        let mut placed = HashSet::from([root]);
        let mut steps = Vec::new();
        walk(model, graph, relevant, root, &mut placed, &mut steps);

        let omitted: Vec<usize> = relevant
            .iter()
            .copied()
            .filter(|t| !placed.contains(t))
            .collect();
        for &t in &omitted {
            log::warn!(
                "table {} is not connected to {} and was omitted",
                model.tables[t].name,
                model.tables[root].name
            );
        }

        Some(Self {
            root,
            steps,
            omitted,
        })
    }

    /// Placed tables: the root, then each joined table in join order.
    pub fn placed(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.root).chain(self.steps.iter().map(|s| s.table))
    }

    /// Allocate aliases in placement order.
    pub fn allocate_aliases(&self, model: &QueryModel, aliases: &mut AliasAllocator) {
        for t in self.placed() {
            aliases.alias_for(&model.tables[t]);
        }
    }

    /// Add the FROM table and every JOIN to `query`.
    pub fn apply(
        &self,
        mut query: Query,
        model: &QueryModel,
        graph: &TableGraph<'_>,
        aliases: &AliasAllocator,
        default_schema: &str,
    ) -> GenerateResult<Query> {
        let table_ref = |idx: usize| -> GenerateResult<TableRef> {
            let table = &model.tables[idx];
            let alias = alias_of(aliases, model, idx)?;
            let schema = if table.schema.trim().is_empty() {
                default_schema
            } else {
                table.schema.as_str()
            };
            Ok(TableRef::new(&table.name)
                .with_schema(schema)
                .with_alias(alias))
        };

        query = query.from(table_ref(self.root)?);

        for step in &self.steps {
            let link = graph.link(step.link);
            let table = table_ref(step.table)?;

            query = match link.relationship.join_type {
                JoinKind::Cross => query.cross_join(table),
                kind => {
                    let on: Expr = table_col(
                        alias_of(aliases, model, link.source)?,
                        &link.source_column.name,
                    )
                    .eq(table_col(
                        alias_of(aliases, model, link.target)?,
                        &link.target_column.name,
                    ));
                    query.join(join_type(kind), table, on)
                }
            };
        }

        Ok(query)
    }
}

fn alias_of<'a>(
    aliases: &'a AliasAllocator,
    model: &QueryModel,
    idx: usize,
) -> GenerateResult<&'a str> {
    let table = &model.tables[idx];
    aliases
        .get(&table.id)
        .ok_or_else(|| GenerateError::Internal(format!("no alias allocated for {}", table.name)))
}

fn join_type(kind: JoinKind) -> JoinType {
    match kind {
        JoinKind::Inner => JoinType::Inner,
        JoinKind::Left => JoinType::Left,
        JoinKind::Right => JoinType::Right,
        JoinKind::FullOuter => JoinType::Full,
        JoinKind::Cross => JoinType::Cross,
    }
}

/// Pick the FROM table among `relevant`.
///
/// Most selected columns wins; without any selection, most outgoing
/// relationships; otherwise the first relevant table. Ties keep input order.
pub fn choose_root(
    model: &QueryModel,
    graph: &TableGraph<'_>,
    relevant: &BTreeSet<usize>,
) -> Option<usize> {
    let first = *relevant.iter().next()?;

    let by_selection = first_max(relevant, |t| model.tables[t].selected_count());
    if model.tables[by_selection].selected_count() > 0 {
        return Some(by_selection);
    }

    let by_outgoing = first_max(relevant, |t| graph.outgoing(t));
    if graph.outgoing(by_outgoing) > 0 {
        return Some(by_outgoing);
    }

    Some(first)
}

/// First index with the strictly greatest key. `relevant` must be non-empty.
fn first_max(relevant: &BTreeSet<usize>, key: impl Fn(usize) -> usize) -> usize {
    let mut best = None;
    for &t in relevant {
        let k = key(t);
        match best {
            Some((_, best_k)) if best_k >= k => {}
            _ => best = Some((t, k)),
        }
    }
    best.map(|(t, _)| t).unwrap_or_default()
}

/// Links leaving `current` toward relevant tables, inner joins first and
/// then in declaration order.
fn candidates(
    model: &QueryModel,
    graph: &TableGraph<'_>,
    relevant: &BTreeSet<usize>,
    current: usize,
) -> Vec<usize> {
    let mut links: Vec<usize> = graph
        .links_of(current)
        .filter(|&l| {
            graph
                .link(l)
                .other_end(current)
                .is_some_and(|far| relevant.contains(&far))
        })
        .collect();
    links.sort_by_key(|&l| {
        let link = graph.link(l);
        (link.relationship.join_type.rank(), link.order)
    });
    links.dedup();
    log::trace!(
        "candidates from {}: {:?}",
        model.tables[current].name,
        links
            .iter()
            .map(|&l| graph.link(l).relationship.id.as_str())
            .collect::<Vec<_>>()
    );
    links
}

/// Depth-first placement from `root`. A table is joined as soon as it is
/// reached and its own links are explored before its siblings'. The stack
/// is explicit, so chain length is bounded by memory, not by thread stack.
fn walk(
    model: &QueryModel,
    graph: &TableGraph<'_>,
    relevant: &BTreeSet<usize>,
    root: usize,
    placed: &mut HashSet<usize>,
    steps: &mut Vec<JoinStep>,
) {
    let mut stack = vec![(root, candidates(model, graph, relevant, root).into_iter())];

    while let Some((current, pending)) = stack.last_mut() {
        let current = *current;
        let Some(l) = pending.next() else {
            stack.pop();
            continue;
        };
        let Some(far) = graph.link(l).other_end(current) else {
            continue;
        };
        if !placed.insert(far) {
            continue;
        }
        log::debug!(
            "join {} via {}",
            model.tables[far].name,
            graph.link(l).relationship.id
        );
        steps.push(JoinStep { table: far, link: l });
        stack.push((far, candidates(model, graph, relevant, far).into_iter()));
    }
}
