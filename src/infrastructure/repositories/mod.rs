//! Repository implementations using SeaORM

pub mod component_repository;
pub mod kit_repository;
pub mod loan_repository;

pub use component_repository::SeaOrmComponentRepository;
pub use kit_repository::SeaOrmKitRepository;
pub use loan_repository::SeaOrmLoanRepository;
