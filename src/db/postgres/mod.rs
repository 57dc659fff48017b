mod versions;

pub use versions::PostgresVersionRepo;
