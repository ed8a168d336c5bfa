//! Logical field names used by the employee metrics.
//!
//! Source files name their columns in many ways; ingestion maps them onto
//! these logical names (see [`crate::columns::ColumnMap`]) so the analytics
//! only ever refer to one spelling.

use serde::{Deserialize, Serialize};

/// Names of the fields consumed by department, geographic, work-life and
/// insight computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub id: String,
    pub department: String,
    pub zone: String,
    pub city: String,
    pub salary: String,
    pub satisfaction: String,
    pub productivity: String,
    pub stress: String,
    pub experience: String,
    pub age: String,
    pub weekly_hours: String,
    pub exercise_hours: String,
    pub sleep_hours: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: "employee_id".into(),
            department: "department".into(),
            zone: "zone".into(),
            city: "city".into(),
            salary: "salary".into(),
            satisfaction: "satisfaction".into(),
            productivity: "productivity".into(),
            stress: "stress_level".into(),
            experience: "experience_years".into(),
            age: "age".into(),
            weekly_hours: "weekly_hours".into(),
            exercise_hours: "exercise_hours".into(),
            sleep_hours: "sleep_hours".into(),
        }
    }
}

impl FieldNames {
    /// Numeric measures that are optional on a record (default to 0).
    pub fn optional_measures(&self) -> Vec<String> {
        vec![
            self.age.clone(),
            self.experience.clone(),
            self.weekly_hours.clone(),
            self.stress.clone(),
            self.productivity.clone(),
            self.exercise_hours.clone(),
            self.sleep_hours.clone(),
        ]
    }
}
