mod versions;

pub use versions::SqliteVersionRepo;
