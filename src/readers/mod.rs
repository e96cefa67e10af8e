pub mod sqlite_reader;
pub mod table_reader;

pub use sqlite_reader::SqliteTableReader;
pub use table_reader::TableReader;
