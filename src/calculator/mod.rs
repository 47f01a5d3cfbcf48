pub mod engine;
pub mod error;

pub use engine::{Calculator, GamesReport, WinRateReport};
pub use error::CalcError;
