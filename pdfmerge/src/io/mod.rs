//! File input and output for the command-line front end.

pub mod reader;
pub mod writer;

pub use reader::{PdfReader, ReadStatistics};
pub use writer::{PdfWriter, WriteStatistics};
