//! Per-department presence for today.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{attendance::RecordWithOwner, employee::Employee};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DepartmentStat {
    pub department: String,
    /// Today's records owned by someone in this department.
    pub present: i64,
    /// Roster members in this department.
    pub total: i64,
    pub absent: i64,
}

/// Builds the rollup in two passes: departments seen on today's records
/// first, then any roster department not seen yet. Output keeps that order.
pub fn department_rollup(today_records: &[RecordWithOwner], roster: &[Employee]) -> Vec<DepartmentStat> {
    let mut order: Vec<DepartmentStat> = Vec::new();
    let mut slot: HashMap<String, usize> = HashMap::new();

    let mut entry = |department: &str| -> usize {
        *slot.entry(department.to_string()).or_insert_with(|| {
            order.push(DepartmentStat {
                department: department.to_string(),
                present: 0,
                total: 0,
                absent: 0,
            });
            order.len() - 1
        })
    };

    let seen: Vec<usize> = today_records
        .iter()
        .map(|r| entry(&r.owner.department))
        .collect();
    let members: Vec<usize> = roster.iter().map(|e| entry(&e.department)).collect();

    for i in seen {
        order[i].present += 1;
    }
    for i in members {
        order[i].total += 1;
    }
    for stat in &mut order {
        stat.absent = stat.total - stat.present;
    }
    order
}
