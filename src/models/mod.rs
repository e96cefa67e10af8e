pub mod cell;
pub mod table;
pub mod vocabulary;

pub use cell::Cell;
pub use table::{Row, Table};
pub use vocabulary::{DewPointCategory, Vocabulary, WindDirection};
