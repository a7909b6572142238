pub mod bar;
pub mod loader;
pub mod synthetic;

pub use bar::{Bar, BarError};
pub use loader::{load_csv, validate_bars, DataError};
pub use synthetic::random_walk;
