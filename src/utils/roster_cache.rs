use std::{sync::Arc, time::Duration};

use moka::future::Cache;
use tracing::debug;

use crate::{
    error::{AttendanceError, Result},
    model::{employee::Employee, role::Role},
    repository::EmployeeRepository,
};

/// Read-through cache of the roster (role `employee`). Registrations
/// invalidate it.
#[derive(Clone)]
pub struct RosterCache {
    cache: Cache<(), Arc<Vec<Employee>>>,
}

impl RosterCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    pub async fn roster(&self, employees: &dyn EmployeeRepository) -> Result<Arc<Vec<Employee>>> {
        self.cache
            .try_get_with((), async {
                debug!("Loading roster");
                employees.list(Some(Role::Employee)).await.map(Arc::new)
            })
            .await
            .map_err(|e: Arc<AttendanceError>| {
                Arc::try_unwrap(e).unwrap_or_else(|shared| AttendanceError::Internal(shared.to_string()))
            })
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }
}

/// Load the roster once at startup so the first dashboard hit is warm.
pub async fn warmup_roster_cache(
    cache: &RosterCache,
    employees: &dyn EmployeeRepository,
) -> anyhow::Result<()> {
    let roster = cache.roster(employees).await?;
    tracing::info!("Roster cache warmup complete: {} employees", roster.len());
    Ok(())
}
