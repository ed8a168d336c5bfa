//! Source column to logical field mapping.
//!
//! Each logical field lists the source column names it accepts, in order of
//! preference. Headers are resolved once per file; rows are then turned into
//! [`Record`]s keyed by logical name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::fields::FieldNames;
use crate::record::{Record, Value};

/// Logical field name to ordered candidate source names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMap {
    aliases: IndexMap<String, Vec<String>>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self::for_fields(&FieldNames::default())
    }
}

impl ColumnMap {
    /// A map with no aliases; every header keeps its own name.
    pub fn empty() -> Self {
        Self {
            aliases: IndexMap::new(),
        }
    }

    /// Known spellings of the employee dataset columns.
    pub fn for_fields(fields: &FieldNames) -> Self {
        let known: [(&String, &[&str]); 13] = [
            (&fields.id, &["employee_id", "empleado_id", "id"]),
            (&fields.department, &["department", "departamento", "dept"]),
            (&fields.zone, &["zone", "zona_geografica", "region"]),
            (&fields.city, &["city", "ciudad"]),
            (&fields.salary, &["salary", "salario_anual", "annual_salary"]),
            (&fields.satisfaction, &["satisfaction", "satisfaccion_laboral", "job_satisfaction"]),
            (&fields.productivity, &["productivity", "productividad_score", "productivity_score"]),
            (&fields.stress, &["stress_level", "nivel_estres", "stress"]),
            (&fields.experience, &["experience_years", "experiencia_anos", "years_experience"]),
            (&fields.age, &["age", "edad"]),
            (&fields.weekly_hours, &["weekly_hours", "horas_semanales", "hours_per_week"]),
            (&fields.exercise_hours, &["exercise_hours", "horas_ejercicio_semana"]),
            (&fields.sleep_hours, &["sleep_hours", "horas_sueno_noche"]),
        ];

        let mut map = Self::empty();
        for (logical, candidates) in known {
            let mut names = vec![logical.clone()];
            names.extend(
                candidates
                    .iter()
                    .filter(|c| **c != logical.as_str())
                    .map(|c| c.to_string()),
            );
            map.aliases.insert(logical.clone(), names);
        }
        map
    }

    /// Builder-style alias registration, replacing any previous candidates.
    pub fn with_alias<S: Into<String>>(
        mut self,
        logical: impl Into<String>,
        candidates: impl IntoIterator<Item = S>,
    ) -> Self {
        self.aliases
            .insert(logical.into(), candidates.into_iter().map(Into::into).collect());
        self
    }

    pub fn candidates(&self, logical: &str) -> Option<&[String]> {
        self.aliases.get(logical).map(Vec::as_slice)
    }

    /// Resolve a header row.
    ///
    /// For each logical field the first candidate present among the headers
    /// wins (case-insensitive, surrounding whitespace ignored). A header can
    /// be claimed once. Unclaimed headers keep their trimmed name.
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> ResolvedColumns {
        let mut names: Vec<String> = headers
            .iter()
            .map(|h| h.as_ref().trim().to_string())
            .collect();
        let mut claimed = vec![false; names.len()];
        let mut missing = Vec::new();

        for (logical, candidates) in &self.aliases {
            let hit = candidates.iter().find_map(|cand| {
                names
                    .iter()
                    .enumerate()
                    .position(|(i, h)| !claimed[i] && h.eq_ignore_ascii_case(cand.trim()))
            });
            match hit {
                Some(i) => {
                    claimed[i] = true;
                    names[i] = logical.clone();
                }
                None => missing.push(logical.clone()),
            }
        }

        ResolvedColumns { names, missing }
    }
}

/// Output field name for every source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedColumns {
    /// One entry per source column, in source order
    pub names: Vec<String>,
    /// Logical fields with no matching column
    pub missing: Vec<String>,
}

impl ResolvedColumns {
    /// Build a record from one row of raw cells.
    ///
    /// Cells beyond the header width are dropped; short rows simply lack the
    /// trailing fields.
    pub fn record<I, S>(&self, cells: I) -> Record
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names
            .iter()
            .zip(cells)
            .map(|(name, cell)| (name.clone(), Value::Text(cell.into())))
            .collect()
    }
}
