use std::fmt::Write;

/// Render the page shown for `type=count`: the title in the head, the total
/// as the whole body.
pub fn render_count_page(total: i64, title: &str, charset: &str) -> String {
    let mut html = String::with_capacity(256);
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html>");
    let _ = writeln!(html, "  <head>");
    let _ = writeln!(html, "    <meta charset=\"{}\">", escape_html(charset));
    let _ = writeln!(html, "    <title>{}</title>", escape_html(title));
    let _ = writeln!(html, "  </head>");
    let _ = writeln!(html, "  <body>");
    let _ = writeln!(html, "    {total}");
    let _ = writeln!(html, "  </body>");
    let _ = writeln!(html, "</html>");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
