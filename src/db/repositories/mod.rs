pub mod enrollment;
pub mod payment;
pub mod period;
pub mod plan;
pub mod role;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod user;
