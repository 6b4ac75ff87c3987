use crate::domain::report::Report;

/// Turns a built report into a downloadable document.
pub trait ReportRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;
    fn render(&self, report: &Report) -> anyhow::Result<Vec<u8>>;
}
