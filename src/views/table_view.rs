/// A row type that can be rendered as one line of an HTML table.
pub trait TableView {
    fn headers() -> &'static [&'static str];

    /// Display text per column, same order as `headers`.
    fn cells(&self) -> Vec<String>;

    fn empty_text() -> &'static str {
        "Geen data"
    }
}
