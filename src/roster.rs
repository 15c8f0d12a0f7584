//! Roster-side rules: the department list, employee codes and registration
//! validation.

use serde::Serialize;

use crate::error::{AttendanceError, Result};

pub const DEFAULT_DEPARTMENTS: [&str; 11] = [
    "Human Resources",
    "Finance",
    "DevOps",
    "IT Support",
    "Product Management",
    "Quality Assurance",
    "Software Engineering",
    "Business Consulting",
    "Cloud Services",
    "UI/UX",
    "Data & Analytics",
];

const CODE_PREFIX: &str = "EMP";

/// The configured set of departments employees may belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Departments(Vec<String>);

impl Departments {
    /// Parses a comma-separated list, dropping blanks and duplicates.
    pub fn parse(list: &str) -> Self {
        let mut names: Vec<String> = Vec::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        Self(names)
    }

    /// Exact match first, then case-insensitive; returns the canonical name.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.0
            .iter()
            .find(|d| d.as_str() == name)
            .or_else(|| self.0.iter().find(|d| d.eq_ignore_ascii_case(name)))
            .map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for Departments {
    fn default() -> Self {
        Self(DEFAULT_DEPARTMENTS.iter().map(|d| d.to_string()).collect())
    }
}

/// Next code after the highest existing `EMP<n>` code, zero-padded to three
/// digits.
pub fn next_employee_code<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let highest = existing
        .into_iter()
        .filter_map(|code| code.strip_prefix(CODE_PREFIX))
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|digits| digits.parse::<u64>().ok())
        .max()
        .unwrap_or(0);

    format!("{CODE_PREFIX}{:03}", highest + 1)
}

/// Registration fields after trimming and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub department: String,
}

pub fn validate_registration(
    name: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
    department: Option<&str>,
    departments: &Departments,
) -> Result<ValidRegistration> {
    fn required(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|v| !v.is_empty())
    }

    let (Some(name), Some(email), Some(password), Some(department)) = (
        required(name),
        required(email),
        password.filter(|p| !p.is_empty()),
        required(department),
    ) else {
        return Err(AttendanceError::Validation(
            "Please provide all required fields".into(),
        ));
    };

    if !email.contains('@') {
        return Err(AttendanceError::Validation("Invalid email address".into()));
    }

    let department = departments.canonical(department).ok_or_else(|| {
        AttendanceError::Validation(format!("Unknown department: {department}"))
    })?;

    Ok(ValidRegistration {
        name: name.to_string(),
        email: email.to_lowercase(),
        password: password.to_string(),
        department: department.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_code_is_emp001() {
        assert_eq!(next_employee_code(Vec::<&str>::new()), "EMP001");
    }

    #[test]
    fn code_follows_highest_numeric_suffix() {
        let codes = ["EMP009", "EMP010", "EMP002", "ADMIN", "EMPX1"];
        assert_eq!(next_employee_code(codes), "EMP011");
        assert_eq!(next_employee_code(["EMP999"]), "EMP1000");
    }

    #[test]
    fn departments_parse_and_match() {
        let d = Departments::parse("Finance, DevOps,,Finance , UI/UX");
        assert_eq!(d.as_slice(), ["Finance", "DevOps", "UI/UX"]);
        assert_eq!(d.canonical("devops"), Some("DevOps"));
        assert_eq!(d.canonical("Legal"), None);
        assert_eq!(Departments::default().as_slice().len(), 11);
    }

    #[test]
    fn registration_requires_every_field() {
        let d = Departments::default();
        let err = validate_registration(Some("Ann"), Some("ann@x.io"), Some(""), Some("Finance"), &d);
        assert!(matches!(err, Err(AttendanceError::Validation(_))));

        let err = validate_registration(Some("  "), Some("ann@x.io"), Some("pw"), Some("Finance"), &d);
        assert!(matches!(err, Err(AttendanceError::Validation(_))));

        let err = validate_registration(Some("Ann"), None, Some("pw"), Some("Finance"), &d);
        assert!(matches!(err, Err(AttendanceError::Validation(_))));
    }

    #[test]
    fn registration_checks_department_against_config() {
        let d = Departments::parse("Finance");
        let err = validate_registration(Some("Ann"), Some("ann@x.io"), Some("pw"), Some("DevOps"), &d);
        assert!(matches!(err, Err(AttendanceError::Validation(_))));

        let ok = validate_registration(Some(" Ann "), Some("Ann@X.io"), Some("pw"), Some("finance"), &d)
            .unwrap();
        assert_eq!(ok.name, "Ann");
        assert_eq!(ok.email, "ann@x.io");
        assert_eq!(ok.department, "Finance");
    }
}
