//! In-memory repositories for tests.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::{
    error::{AttendanceError, Result},
    model::{
        attendance::{AttendanceRecord, Checkout, NewAttendance, RecordWithOwner},
        day::{Day, DayRange},
        employee::{Credentials, Employee, NewEmployee},
        role::Role,
    },
    repository::{AttendanceRepository, EmployeeRepository, RecordFilter},
};

#[derive(Default)]
struct Inner {
    employees: Vec<(Employee, String)>,
    records: Vec<AttendanceRecord>,
}

/// Both repositories over one shared store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(self, employees: Vec<Employee>) -> Self {
        {
            let mut inner = self.inner.write().unwrap();
            for employee in employees {
                inner.employees.push((employee, String::new()));
            }
        }
        self
    }

    /// Seeds records as-is, bypassing the uniqueness check.
    pub fn with_records(self, records: Vec<AttendanceRecord>) -> Self {
        self.inner.write().unwrap().records.extend(records);
        self
    }

    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.inner.read().unwrap().records.clone()
    }
}

fn newest_first(records: &mut [AttendanceRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn find_for_day(&self, employee_id: u64, day: Day) -> Result<Option<AttendanceRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .records
            .iter()
            .find(|r| r.employee_id == employee_id && r.date == day)
            .cloned())
    }

    async fn insert(&self, new: &NewAttendance) -> Result<AttendanceRecord> {
        let mut inner = self.inner.write().unwrap();
        if inner
            .records
            .iter()
            .any(|r| r.employee_id == new.employee_id && r.date == new.date)
        {
            return Err(AttendanceError::DuplicateCheckIn);
        }
        let id = inner.records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = AttendanceRecord::opened(id, new);
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn checkout(&self, checkout: &Checkout) -> Result<AttendanceRecord> {
        let mut inner = self.inner.write().unwrap();
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == checkout.record_id)
            .ok_or(AttendanceError::NoCheckInRecord)?;
        if record.check_out_time.is_some() {
            return Err(AttendanceError::AlreadyCheckedOut);
        }
        *record = record.clone().closed(checkout);
        Ok(record.clone())
    }

    async fn list_for_employee(
        &self,
        employee_id: u64,
        range: Option<DayRange>,
    ) -> Result<Vec<AttendanceRecord>> {
        let inner = self.inner.read().unwrap();
        let mut records: Vec<_> = inner
            .records
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .filter(|r| range.is_none_or(|range| range.contains(r.date)))
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn list_range(&self, range: DayRange) -> Result<Vec<AttendanceRecord>> {
        let inner = self.inner.read().unwrap();
        let mut records: Vec<_> = inner
            .records
            .iter()
            .filter(|r| range.contains(r.date))
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn list_with_owner(&self, filter: &RecordFilter) -> Result<Vec<RecordWithOwner>> {
        let inner = self.inner.read().unwrap();
        let mut records: Vec<_> = inner
            .records
            .iter()
            .filter(|r| filter.range.is_none_or(|range| range.contains(r.date)))
            .filter(|r| {
                filter
                    .employee_ids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&r.employee_id))
            })
            .cloned()
            .collect();
        newest_first(&mut records);

        Ok(records
            .into_iter()
            .filter_map(|record| {
                let (owner, _) = inner
                    .employees
                    .iter()
                    .find(|(e, _)| e.id == record.employee_id)?;
                Some(RecordWithOwner {
                    owner: owner.brief(),
                    record,
                })
            })
            .collect())
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn list(&self, role: Option<Role>) -> Result<Vec<Employee>> {
        let inner = self.inner.read().unwrap();
        let mut employees: Vec<_> = inner
            .employees
            .iter()
            .map(|(e, _)| e)
            .filter(|e| role.is_none_or(|role| e.role == role))
            .cloned()
            .collect();
        employees.sort_by_key(|e| e.id);
        Ok(employees)
    }

    async fn find(&self, id: u64) -> Result<Option<Employee>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .employees
            .iter()
            .find(|(e, _)| e.id == id)
            .map(|(e, _)| e.clone()))
    }

    async fn find_credentials(&self, login: &str) -> Result<Option<Credentials>> {
        let inner = self.inner.read().unwrap();
        let lower = login.to_lowercase();
        let found = inner
            .employees
            .iter()
            .find(|(e, _)| e.email == lower)
            .or_else(|| inner.employees.iter().find(|(e, _)| e.employee_id == login));
        Ok(found.map(|(employee, hash)| Credentials {
            employee: employee.clone(),
            password_hash: hash.clone(),
        }))
    }

    async fn employee_codes(&self) -> Result<Vec<String>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .employees
            .iter()
            .map(|(e, _)| e.employee_id.clone())
            .collect())
    }

    async fn create(&self, new: &NewEmployee, code: &str) -> Result<Employee> {
        let mut inner = self.inner.write().unwrap();
        if inner.employees.iter().any(|(e, _)| e.email == new.email) {
            return Err(AttendanceError::EmailTaken);
        }
        let id = inner.employees.iter().map(|(e, _)| e.id).max().unwrap_or(0) + 1;
        let employee = Employee {
            id,
            name: new.name.clone(),
            email: new.email.clone(),
            employee_id: code.to_string(),
            department: new.department.clone(),
            role: new.role,
            join_date: new.join_date,
        };
        inner
            .employees
            .push((employee.clone(), new.password_hash.clone()));
        Ok(employee)
    }
}
