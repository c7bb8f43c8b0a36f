//! Persistence - SeaORM Postgres repository plus an in-memory fallback.

mod connections;
pub mod entity;
mod memory;
mod postgres_repo;

pub use connections::DatabaseConfig;
pub use memory::InMemoryUserRepository;
pub use postgres_repo::PostgresUserRepository;

#[cfg(test)]
mod tests;
