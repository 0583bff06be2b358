//! Printable HTML rendition, served when PDF rendering fails

use std::fmt::Write;

use shared::models::Menu;

use super::strip_markup;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = "body{font-family:Georgia,serif;max-width:720px;margin:0 auto;text-align:center;color:#1e293b}\
section{page-break-after:always;padding:24px 0}\
h1{font-size:32px}h2{font-size:22px;text-transform:uppercase;letter-spacing:2px}\
.item{margin:16px 0}.tags{font-size:11px;color:#64748b}.sub{font-size:13px;color:#475569}";

pub fn render(menu: &Menu) -> String {
    let mut html = String::new();
    let title = escape(&menu.title);

    // Writing into a String cannot fail
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title><style>{STYLE}</style></head><body>"
    );
    let _ = write!(
        html,
        "<section><h1>{title}</h1><p>{}</p><p>{}</p></section>",
        escape(&strip_markup(&menu.event_description)),
        escape(&menu.cuisine_label),
    );

    for section in &menu.sections {
        let _ = write!(html, "<section><h2>{}</h2>", escape(&section.category));
        for item in &section.items {
            let _ = write!(
                html,
                "<div class=\"item\"><h3>{}</h3><p>{}</p>",
                escape(&item.name),
                escape(&item.description)
            );
            if !item.dietary_tags.is_empty() {
                let _ = write!(
                    html,
                    "<p class=\"tags\">{}</p>",
                    escape(&item.dietary_tags.join(" · "))
                );
            }
            for sub in &item.sub_items {
                let _ = write!(
                    html,
                    "<p class=\"sub\">{} {}</p>",
                    escape(&sub.name),
                    escape(&sub.description)
                );
            }
            html.push_str("</div>");
        }
        html.push_str("</section>");
    }

    let _ = write!(
        html,
        "<section><h2>Wine Pairing</h2><p>{}</p><h2>Chef's Notes</h2><p>{}</p></section>",
        escape(&menu.wine_pairing),
        escape(&menu.chefs_notes),
    );
    html.push_str("<script>window.onload = () => window.print();</script></body></html>");
    html
}
