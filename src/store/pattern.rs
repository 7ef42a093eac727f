//! Fixed graph patterns over a single subject, compiled to SQL self-joins.
//!
//! A [`GroupPattern`] describes one fact-group: a set of predicates that must
//! (or may) hang off the same subject, each with either a fixed object value
//! or a variable to bind. Matching returns one [`Binding`] per solution.

use std::collections::BTreeMap;

use rusqlite::{params_from_iter, Connection};

/// Object position of a constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ObjectTerm {
    /// Object must equal this value exactly.
    Bound(String),
    /// Object is captured into the named variable.
    Var(String),
}

#[derive(Debug, Clone)]
struct Constraint {
    predicate: String,
    object: ObjectTerm,
    optional: bool,
}

/// A conjunction of predicate/object constraints sharing one subject.
#[derive(Debug, Clone, Default)]
pub struct GroupPattern {
    constraints: Vec<Constraint>,
    projection: Vec<String>,
    distinct: bool,
    limit: Option<usize>,
}

impl GroupPattern {
    /// Create an empty pattern.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `predicate` with an object equal to `value`.
    #[must_use]
    pub fn bind(mut self, predicate: impl Into<String>, value: impl Into<String>) -> Self {
        self.constraints.push(Constraint {
            predicate: predicate.into(),
            object: ObjectTerm::Bound(value.into()),
            optional: false,
        });
        self
    }

    /// Require `predicate` and capture its object as `var`.
    #[must_use]
    pub fn require(mut self, predicate: impl Into<String>, var: impl Into<String>) -> Self {
        self.constraints.push(Constraint {
            predicate: predicate.into(),
            object: ObjectTerm::Var(var.into()),
            optional: false,
        });
        self
    }

    /// Capture the object of `predicate` as `var` when present.
    #[must_use]
    pub fn optional(mut self, predicate: impl Into<String>, var: impl Into<String>) -> Self {
        self.constraints.push(Constraint {
            predicate: predicate.into(),
            object: ObjectTerm::Var(var.into()),
            optional: true,
        });
        self
    }

    /// Set the variables returned in each binding.
    #[must_use]
    pub fn select<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = vars.into_iter().map(Into::into).collect();
        self
    }

    /// Collapse identical solutions.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Return at most `n` solutions.
    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Compile the pattern into SQL text and its positional parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidColumnName` if a projected variable is never introduced
    /// by a constraint.
    pub fn to_sql(&self) -> Result<(String, Vec<String>), rusqlite::Error> {
        let anchor = self.constraints.iter().position(|c| !c.optional);

        let mut aliases: BTreeMap<&str, String> = BTreeMap::new();
        let mut joins = String::new();
        let mut join_params = Vec::new();
        let mut filters = Vec::new();
        let mut where_params = Vec::new();

        let from = match anchor {
            Some(_) => "triples t0".to_string(),
            None => "(SELECT DISTINCT subject FROM triples) t0".to_string(),
        };

        // The anchor constraint lives in the WHERE clause on t0; every other
        // constraint becomes its own aliased join back to t0.subject.
        let mut next_alias = 1;
        for (index, constraint) in self.constraints.iter().enumerate() {
            let alias = if Some(index) == anchor {
                "t0".to_string()
            } else {
                let alias = format!("t{next_alias}");
                next_alias += 1;
                alias
            };

            let mut conditions = vec![format!("{alias}.predicate = ?")];
            let mut params = vec![constraint.predicate.clone()];
            match &constraint.object {
                ObjectTerm::Bound(value) => {
                    conditions.push(format!("{alias}.object = ?"));
                    params.push(value.clone());
                }
                ObjectTerm::Var(var) => {
                    if let Some(existing) = aliases.get(var.as_str()) {
                        conditions.push(format!("{alias}.object = {existing}.object"));
                    } else {
                        aliases.insert(var.as_str(), alias.clone());
                    }
                }
            }

            if Some(index) == anchor {
                filters.extend(conditions);
                where_params.extend(params);
            } else {
                let kind = if constraint.optional {
                    "LEFT JOIN"
                } else {
                    "JOIN"
                };
                joins.push_str(&format!(
                    " {kind} triples {alias} ON {alias}.subject = t0.subject AND {}",
                    conditions.join(" AND ")
                ));
                join_params.extend(params);
            }
        }

        let mut columns = Vec::with_capacity(self.projection.len());
        for var in &self.projection {
            let alias = aliases
                .get(var.as_str())
                .ok_or_else(|| rusqlite::Error::InvalidColumnName(var.clone()))?;
            columns.push(format!("{alias}.object"));
        }
        if columns.is_empty() {
            columns.push("t0.subject".to_string());
        }

        // Without DISTINCT, solutions come grouped by subject so "first match"
        // is stable across calls.
        let mut order = Vec::with_capacity(columns.len() + 1);
        if !self.distinct {
            order.push("t0.subject".to_string());
        }
        order.extend((1..=columns.len()).map(|i| i.to_string()));

        let mut sql = format!(
            "SELECT {}{} FROM {from}{joins}",
            if self.distinct { "DISTINCT " } else { "" },
            columns.join(", "),
        );
        if !filters.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&filters.join(" AND "));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&order.join(", "));
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        join_params.extend(where_params);
        Ok((sql, join_params))
    }

    /// Run the pattern on an open connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if compilation or the underlying query fails.
    pub fn execute(&self, conn: &Connection) -> Result<Vec<Binding>, rusqlite::Error> {
        let (sql, params) = self.to_sql()?;
        tracing::trace!(sql = %sql, params = ?params, "Executing group pattern");

        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            let mut values = BTreeMap::new();
            for (index, var) in self.projection.iter().enumerate() {
                if let Some(value) = row.get::<_, Option<String>>(index)? {
                    values.insert(var.clone(), value);
                }
            }
            Ok(Binding { values })
        })?;

        let bindings = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(bindings)
    }
}

/// One solution of a [`GroupPattern`]: projected variables and their values.
///
/// Variables left unbound by an optional constraint are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    values: BTreeMap<String, String>,
}

impl Binding {
    /// Value bound to `var`, if any.
    #[must_use]
    pub fn get(&self, var: &str) -> Option<&str> {
        self.values.get(var).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SCHEMA;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        let rows = [
            ("obs1", "station", "07005"),
            ("obs1", "date", "20241113"),
            ("obs1", "temperature", "278.35"),
            ("obs2", "station", "07005"),
            ("obs2", "date", "20241114"),
            ("obs3", "station", "07015"),
            ("obs3", "date", "20241114"),
            ("obs3", "temperature", "mq"),
        ];
        for (s, p, o) in rows {
            conn.execute(
                "INSERT INTO triples (subject, predicate, object) VALUES (?1, ?2, ?3)",
                [s, p, o],
            )
            .unwrap();
        }
        conn
    }

    #[test]
    fn test_distinct_projection() {
        let conn = seeded();
        let pattern = GroupPattern::new()
            .require("station", "station")
            .require("date", "date")
            .select(["station"])
            .distinct();

        let bindings = pattern.execute(&conn).unwrap();
        let stations: Vec<_> = bindings.iter().filter_map(|b| b.get("station")).collect();
        assert_eq!(stations, vec!["07005", "07015"]);
    }

    #[test]
    fn test_bound_object_filters_subjects() {
        let conn = seeded();
        let pattern = GroupPattern::new()
            .bind("station", "07005")
            .require("date", "date")
            .select(["date"])
            .distinct();

        let bindings = pattern.execute(&conn).unwrap();
        let dates: Vec<_> = bindings.iter().filter_map(|b| b.get("date")).collect();
        assert_eq!(dates, vec!["20241113", "20241114"]);
    }

    #[test]
    fn test_optional_constraint_leaves_variable_unbound() {
        let conn = seeded();
        let pattern = GroupPattern::new()
            .bind("station", "07005")
            .bind("date", "20241114")
            .optional("temperature", "temperature")
            .select(["temperature"]);

        let bindings = pattern.execute(&conn).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].get("temperature"), None);
        assert_eq!(bindings[0], Binding::default());
    }

    #[test]
    fn test_required_constraint_excludes_incomplete_groups() {
        let conn = seeded();
        let pattern = GroupPattern::new()
            .require("station", "station")
            .require("temperature", "temperature")
            .select(["station", "temperature"]);

        let bindings = pattern.execute(&conn).unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].get("temperature"), Some("278.35"));
        assert_eq!(bindings[1].get("temperature"), Some("mq"));
    }

    #[test]
    fn test_no_match_returns_empty() {
        let conn = seeded();
        let pattern = GroupPattern::new()
            .bind("station", "99999")
            .require("date", "date")
            .select(["date"]);

        assert!(pattern.execute(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_projection_is_rejected() {
        let pattern = GroupPattern::new()
            .require("station", "station")
            .select(["humidity"]);

        let err = pattern.to_sql().unwrap_err();
        assert!(matches!(err, rusqlite::Error::InvalidColumnName(name) if name == "humidity"));
    }

    #[test]
    fn test_sql_parameter_order_matches_text() {
        let pattern = GroupPattern::new()
            .bind("station", "07005")
            .require("date", "date")
            .select(["date"]);

        let (sql, params) = pattern.to_sql().unwrap();
        assert!(sql.contains("JOIN triples t1 ON t1.subject = t0.subject"));
        assert!(sql.ends_with("ORDER BY t0.subject, 1"));
        // Join parameters precede the WHERE clause parameters.
        assert_eq!(params, vec!["date", "station", "07005"]);
    }

    #[test]
    fn test_optional_only_pattern_anchors_on_subjects() {
        let conn = seeded();
        let pattern = GroupPattern::new()
            .optional("temperature", "temperature")
            .select(["temperature"]);

        let bindings = pattern.execute(&conn).unwrap();
        assert_eq!(bindings.len(), 3);
    }

    #[test]
    fn test_limit_keeps_first_solutions() {
        let conn = seeded();
        let pattern = GroupPattern::new()
            .require("station", "station")
            .select(["station"])
            .limit(1);

        let (sql, _) = pattern.to_sql().unwrap();
        assert!(sql.ends_with("ORDER BY t0.subject, 1 LIMIT 1"));

        let bindings = pattern.execute(&conn).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].get("station"), Some("07005"));
    }
}
