//! Attendance status derivation and aggregation.
//!
//! Everything here is pure: callers load records and the roster, pass them
//! in, and persist whatever comes back.

pub mod department;
pub mod status;
pub mod summary;
pub mod team;
pub mod trend;

pub use department::{DepartmentStat, department_rollup};
pub use status::{begin_day, finalize_checkout};
pub use summary::{AttendanceSummary, MonthlyStats, TeamSummary, monthly_stats, summarize, team_summary};
pub use team::{TeamDayStatus, team_day_status};
pub use trend::{TrendPoint, day_point, weekly_trend};
