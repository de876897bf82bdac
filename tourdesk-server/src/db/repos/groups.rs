//! Group repository
//!
//! Groups are read together with their enrollment headcount:
//! - one fetch over the group table
//! - one grouped count over the enrollment table, left-joined by date
//!
//! Dates without enrollments report a headcount of 0.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use super::entity::EntityRepo;
use crate::catalog::Table;
use crate::db::gateway::{DbError, Filter, Gateway};
use crate::models::{NaturalKey, Record, Value};
use crate::schema::{DEPARTURE_DATE, HEADCOUNT};

/// Group reads with headcount
pub struct GroupRepo<'a> {
    gateway: &'a dyn Gateway,
    groups: &'a Table,
    enrollments: &'a Table,
}

impl<'a> GroupRepo<'a> {
    pub fn new(gateway: &'a dyn Gateway, groups: &'a Table, enrollments: &'a Table) -> Self {
        Self {
            gateway,
            groups,
            enrollments,
        }
    }

    /// List groups with headcounts.
    pub async fn list(&self) -> Result<Vec<Record>, DbError> {
        let mut groups = EntityRepo::new(self.gateway, self.groups)
            .list(&Filter::all())
            .await?;
        if groups.is_empty() {
            return Ok(groups);
        }

        let counts = self.headcounts(&Filter::all()).await?;
        for group in &mut groups {
            attach_headcount(group, &counts);
        }
        Ok(groups)
    }

    /// Get a single group by departure date with headcount.
    pub async fn get(&self, key: &NaturalKey) -> Result<Record, DbError> {
        let mut group = EntityRepo::new(self.gateway, self.groups).get(key).await?;

        let filter = match key.get(DEPARTURE_DATE) {
            Some(date) => Filter::all().eq(DEPARTURE_DATE, date.clone()),
            None => Filter::all(),
        };
        let counts = self.headcounts(&filter).await?;
        attach_headcount(&mut group, &counts);
        Ok(group)
    }

    /// Enrollment counts keyed by departure date.
    async fn headcounts(&self, filter: &Filter) -> Result<HashMap<NaiveDateTime, i64>, DbError> {
        let Some(column) = self.enrollments.column(DEPARTURE_DATE) else {
            return Ok(HashMap::new());
        };

        let counts = self
            .gateway
            .count_by(self.enrollments, column, filter)
            .await?;
        Ok(counts
            .into_iter()
            .filter_map(|(date, n)| match date {
                Value::Timestamp(date) => Some((date, n)),
                _ => None,
            })
            .collect())
    }
}

fn attach_headcount(group: &mut Record, counts: &HashMap<NaiveDateTime, i64>) {
    let count = match group.get(DEPARTURE_DATE) {
        Some(Value::Timestamp(date)) => counts.get(date).copied().unwrap_or(0),
        _ => 0,
    };
    group.set(HEADCOUNT, Value::Integer(count));
}
