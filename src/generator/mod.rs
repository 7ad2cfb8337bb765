//! The SQL generation engine.
//!
//! [`QueryGenerator`] is the single entry point. Each call takes a complete
//! model snapshot and returns SQL text. Failures never escape as errors or
//! panics; they come back as `-- ` comment lines, so a caller previewing the
//! output can show it as-is and detect soft failures by the `--` prefix.
//!
//! A SELECT is produced in stages:
//!
//! 1. [`relevance`] picks the tables that belong in the statement.
//! 2. [`join_graph`] picks a root and plans one JOIN per reachable table.
//! 3. [`alias`] names every placed table.
//! 4. [`select`] and [`filter`] build the SELECT list and WHERE clause.

pub mod alias;
pub mod ddl;
pub mod dml;
pub mod error;
pub mod filter;
pub mod join_graph;
pub mod relevance;
pub mod select;
pub mod values;

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::model::{Aggregate, QueryModel, Table, ValueMap};
use crate::sql::{raw_sql, Dialect, Expr, Query};

pub use alias::{AliasAllocator, AliasStyle};
pub use error::{GenerateError, GenerateResult};

use error::comment_lines;
use join_graph::JoinPlan;
use relevance::TableGraph;
use select::{OutputNames, Scope};

/// Knobs for one generator instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub alias_style: AliasStyle,
    /// Refuse to generate when a relevant table cannot be joined, instead
    /// of dropping it with a trailing warning.
    pub strict_connectivity: bool,
    /// Append CreatedBy/CreatedAt/ModifiedBy/ModifiedAt to CREATE TABLE.
    pub audit_columns: bool,
    /// Schema used for tables whose own schema is blank.
    pub default_schema: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            alias_style: AliasStyle::Prefix,
            strict_connectivity: false,
            audit_columns: true,
            default_schema: "dbo".to_string(),
        }
    }
}

/// Generates T-SQL from canvas models.
///
/// Alias state lives on the instance and is reset by every call. Share an
/// instance across threads only behind a lock; a fresh generator per call
/// is cheaper.
#[derive(Debug)]
pub struct QueryGenerator {
    options: GeneratorOptions,
    aliases: AliasAllocator,
    dialect: Dialect,
}

impl Default for QueryGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

impl QueryGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        let aliases = AliasAllocator::new(options.alias_style);
        Self {
            options,
            aliases,
            dialect: Dialect::TSql,
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Alias given to a table by the most recent call.
    pub fn table_alias(&self, table_id: &str) -> Option<&str> {
        self.aliases.get(table_id)
    }

    /// SELECT over the selected columns and everything joined to them.
    pub fn generate_select(&mut self, model: &QueryModel) -> String {
        self.guarded(|gen| gen.select(model))
    }

    /// SELECT with GROUP BY over `group_by` columns and `aggregates`.
    pub fn generate_grouped_select(
        &mut self,
        model: &QueryModel,
        group_by: &[String],
        aggregates: &[Aggregate],
    ) -> String {
        self.guarded(|gen| gen.grouped_select(model, group_by, aggregates))
    }

    pub fn generate_insert(&mut self, table: &Table, values: &ValueMap) -> String {
        self.guarded(|gen| {
            let target = dml::Target::new(table, &gen.options.default_schema);
            dml::insert(target, values, gen.dialect)
        })
    }

    pub fn generate_update(
        &mut self,
        table: &Table,
        values: &ValueMap,
        where_values: &ValueMap,
    ) -> String {
        self.guarded(|gen| {
            let target = dml::Target::new(table, &gen.options.default_schema);
            dml::update(target, values, where_values, gen.dialect)
        })
    }

    pub fn generate_delete(&mut self, table: &Table, where_values: &ValueMap) -> String {
        self.guarded(|gen| {
            let target = dml::Target::new(table, &gen.options.default_schema);
            dml::delete(target, where_values, gen.dialect)
        })
    }

    pub fn generate_create_table(&mut self, table: &Table) -> String {
        self.guarded(|gen| {
            ddl::create_table(
                table,
                &gen.options.default_schema,
                gen.options.audit_columns,
                gen.dialect,
            )
        })
    }

    /// Run one pass: reset alias state, then turn errors and panics into
    /// comments.
    fn guarded<F>(&mut self, f: F) -> String
    where
        F: FnOnce(&mut Self) -> GenerateResult<String>,
    {
        self.aliases.reset();
        match panic::catch_unwind(AssertUnwindSafe(|| f(self))) {
            Ok(Ok(sql)) => sql,
            Ok(Err(err)) => {
                log::debug!("generation failed: {err}");
                err.to_comment()
            }
            Err(payload) => {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!("generator panicked: {msg}");
                GenerateError::Internal(msg).to_comment()
            }
        }
    }

    fn select(&mut self, model: &QueryModel) -> GenerateResult<String> {
        let graph = TableGraph::build(model);
        let relevant = relevance::relevant_tables(model, &graph);
        let (plan, query) = self.plan(model, &graph, &relevant)?;

        let scope = Scope::new(model, &plan, &self.aliases)?;
        let mut names = OutputNames::new();
        let mut items = select::table_items(&scope, &mut names);
        items.extend(select::predefined_items(model, &mut names));

        let mut query = query.select(items);
        if let Some(predicate) = filter::where_clause(&scope) {
            query = query.filter(predicate);
        }
        query = query
            .group_by(verbatim(&model.group_by_columns))
            .order_by(verbatim(&model.order_by_columns));

        Ok(self.finish(model, &plan, query))
    }

    fn grouped_select(
        &mut self,
        model: &QueryModel,
        group_by: &[String],
        aggregates: &[Aggregate],
    ) -> GenerateResult<String> {
        let graph = TableGraph::build(model);
        let seeds: BTreeSet<usize> = group_by
            .iter()
            .chain(aggregates.iter().map(|a| &a.column_id))
            .filter_map(|id| {
                let (table, _) = model.find_column(id)?;
                model.tables.iter().position(|t| t.id == table.id)
            })
            .collect();
        let relevant = graph.relevant(seeds);
        let (plan, query) = self.plan(model, &graph, &relevant)?;

        let scope = Scope::new(model, &plan, &self.aliases)?;
        let mut names = OutputNames::new();
        let (mut items, keys) = select::group_items(model, &scope, group_by, &mut names);
        items.extend(select::aggregate_items(model, &scope, aggregates, &mut names));
        if items.is_empty() {
            return Err(GenerateError::NoRelevantTables);
        }

        let mut query = query.select(items);
        if let Some(predicate) = filter::where_clause(&scope) {
            query = query.filter(predicate);
        }
        query = query
            .group_by(keys)
            .order_by(verbatim(&model.order_by_columns));

        Ok(self.finish(model, &plan, query))
    }

    /// Plan joins over `relevant`, name the tables, and build FROM/JOIN.
    fn plan(
        &mut self,
        model: &QueryModel,
        graph: &TableGraph<'_>,
        relevant: &BTreeSet<usize>,
    ) -> GenerateResult<(JoinPlan, Query)> {
        let plan = JoinPlan::build(model, graph, relevant).ok_or(GenerateError::NoRelevantTables)?;

        if self.options.strict_connectivity && !plan.omitted.is_empty() {
            return Err(GenerateError::Disconnected {
                tables: table_names(model, &plan.omitted),
            });
        }

        plan.allocate_aliases(model, &mut self.aliases);
        let query = plan.apply(
            Query::new(),
            model,
            graph,
            &self.aliases,
            &self.options.default_schema,
        )?;
        Ok((plan, query))
    }

    fn finish(&self, model: &QueryModel, plan: &JoinPlan, query: Query) -> String {
        let sql = query.to_sql(self.dialect);
        if plan.omitted.is_empty() {
            return sql;
        }
        let warning = format!(
            "Warning: table(s) not connected to the join graph were omitted: {}",
            table_names(model, &plan.omitted).join(", ")
        );
        format!("{sql}\n{}", comment_lines(&[warning]))
    }
}

fn table_names(model: &QueryModel, indices: &[usize]) -> Vec<String> {
    indices.iter().map(|&i| model.tables[i].name.clone()).collect()
}

fn verbatim(entries: &[String]) -> Vec<Expr> {
    entries
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(raw_sql)
        .collect()
}
