/// Renders the HTML fragments embedded in the board payload. Boards swap in
/// their own implementation to change card or column heading markup.
pub trait BoardRenderer: Send + Sync {
    fn item_title(&self, item: &ItemContext<'_>) -> String;
    fn column_title(&self, name: &str, count: usize) -> String;
}

/// One prepared card field: heading and display value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCell {
    pub label: String,
    pub value: String,
}

/// Everything a renderer sees for one card.
#[derive(Debug)]
pub struct ItemContext<'a> {
    pub pk: &'a str,
    pub fields: &'a [FieldCell],
}

/// Default renderer: cards as definition lists, column headings as a name
/// span plus a count span.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableBoardRenderer;

impl BoardRenderer for TableBoardRenderer {
    fn item_title(&self, item: &ItemContext<'_>) -> String {
        let mut html = String::from("<dl class=\"board-item\">");
        for cell in item.fields {
            html.push_str("<dt>");
            html.push_str(&escape_html(&cell.label));
            html.push_str("</dt><dd>");
            html.push_str(&escape_html(&cell.value));
            html.push_str("</dd>");
        }
        html.push_str("</dl>");
        html
    }

    fn column_title(&self, name: &str, count: usize) -> String {
        format!(
            "<span class=\"board-column-name\">{}</span> <span class=\"board-column-count\">{count}</span>",
            escape_html(name)
        )
    }
}

/// Escapes text interpolated into the generated fragments.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
