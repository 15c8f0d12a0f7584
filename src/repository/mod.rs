//! Storage seams for attendance records and the employee roster.

use async_trait::async_trait;

use crate::{
    error::Result,
    model::{
        attendance::{AttendanceRecord, Checkout, NewAttendance, RecordWithOwner},
        day::{Day, DayRange},
        employee::{Credentials, Employee, NewEmployee},
        role::Role,
    },
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

/// Filter for owner-joined record listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub range: Option<DayRange>,
    /// `Some(empty)` matches nothing.
    pub employee_ids: Option<Vec<u64>>,
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_for_day(&self, employee_id: u64, day: Day) -> Result<Option<AttendanceRecord>>;

    /// Inserts a new record. Must fail with `DuplicateCheckIn` if a record
    /// already exists for the same employee and day, atomically.
    async fn insert(&self, new: &NewAttendance) -> Result<AttendanceRecord>;

    /// Closes an open record. Must fail with `AlreadyCheckedOut` if the
    /// record was closed in the meantime.
    async fn checkout(&self, checkout: &Checkout) -> Result<AttendanceRecord>;

    /// One employee's records, newest first.
    async fn list_for_employee(
        &self,
        employee_id: u64,
        range: Option<DayRange>,
    ) -> Result<Vec<AttendanceRecord>>;

    /// Everyone's records in `range`, newest first.
    async fn list_range(&self, range: DayRange) -> Result<Vec<AttendanceRecord>>;

    /// Records joined with their owner, newest first.
    async fn list_with_owner(&self, filter: &RecordFilter) -> Result<Vec<RecordWithOwner>>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// All employees, optionally restricted to one role, ordered by id.
    async fn list(&self, role: Option<Role>) -> Result<Vec<Employee>>;

    async fn find(&self, id: u64) -> Result<Option<Employee>>;

    /// Looks up login data by email or employee code.
    async fn find_credentials(&self, login: &str) -> Result<Option<Credentials>>;

    async fn employee_codes(&self) -> Result<Vec<String>>;

    /// Must fail with `EmailTaken` if the email is already registered.
    async fn create(&self, new: &NewEmployee, code: &str) -> Result<Employee>;
}
