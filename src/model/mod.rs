pub mod attendance;
pub mod day;
pub mod employee;
pub mod role;
