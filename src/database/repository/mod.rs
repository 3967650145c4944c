pub mod company;
pub mod job;
pub mod user;

pub use company::CompanyRepository;
pub use job::JobRepository;
pub use user::UserRepository;
