pub mod layout;
pub mod pdf;

pub use pdf::{PdfReportRenderer, APPLICATION_PDF};
