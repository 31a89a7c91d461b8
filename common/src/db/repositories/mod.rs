// Postgres repositories, one per service table

pub mod department;
pub mod employee;
pub mod job_details;
pub mod project;
pub mod user;

pub use department::DepartmentRepository;
pub use employee::EmployeeRepository;
pub use job_details::JobDetailsRepository;
pub use project::ProjectRepository;
pub use user::UserRepository;
