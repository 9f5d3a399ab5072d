//! HTML/CSS output for one calendar card.

use std::fmt::Write as _;

use crate::calendar::{Grid, WEEKDAY_LABELS};
use crate::theme::Design;
use crate::widget::WidgetAttrs;

pub const EMBED_TAG: &str = "my-calendar";

/// Output of one render. Replaced wholesale on every generate.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCalendar {
    pub attrs: WidgetAttrs,
    pub grid:  Grid,
    pub style: String,
    pub table: String,
}

impl RenderedCalendar {
    /// Style block followed by the table: what a mail client needs to show
    /// the card with inline styling.
    pub fn rich_html(&self) -> String {
        format!("<style>{}</style>{}", self.style, self.table)
    }

    /// The custom-element tag that would produce this card.
    pub fn embed_tag(&self) -> String {
        let mut out = format!("<{EMBED_TAG}");
        for (name, value) in self.attrs.to_attributes() {
            let _ = write!(out, " {name}=\"{}\"", escape_attr(&value));
        }
        let _ = write!(out, "></{EMBED_TAG}>");
        out
    }

    pub fn standalone_document(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{} {}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            self.grid.month_name(), self.grid.year, self.rich_html(),
        )
    }
}

pub fn render(attrs: &WidgetAttrs) -> RenderedCalendar {
    let grid  = Grid::compute(&attrs.request());
    let style = style_block(attrs.size, attrs.design);
    let table = table_markup(&grid, attrs.design);
    tracing::debug!(
        month = grid.month, year = grid.year, design = %attrs.design,
        weeks = grid.week_count(), "rendered calendar"
    );
    RenderedCalendar { attrs: attrs.clone(), grid, style, table }
}

// ─── CSS ──────────────────────────────────────────────────────────────────────

pub fn style_block(size: u32, design: Design) -> String {
    let c      = design.palette();
    let size   = f64::from(size);
    let font   = size / 15.0;
    let cell   = size / 7.0;
    let header = size / 10.0;
    let pad    = size / 50.0;
    format!(
        r#"
        table {{
            display: inline-block;
            margin: 10px;
            border-collapse: collapse;
            width: {size}px;
            text-align: center;
            font-family: Arial, sans-serif;
            font-size: {font}px;
            border-radius: 8px;
            background-color: {bg};
            border-color: {border};
            color: {text};
        }}

        th, td {{
            border: 1px solid {border};
            padding: 0;
            height: {cell}px;
            width: {cell}px;
            box-sizing: border-box;
            line-height: {cell}px;
        }}

        th.month-header {{
            font-size: {header}px;
            font-weight: bold;
            padding: {pad}px;
            border-radius: 8px 8px 0 0;
            text-transform: uppercase;
            background-color: {border};
            color: {text};
        }}

        td.highlight {{
            background-color: {highlight};
            color: #fff;
            font-weight: bold;
            transition: background-color 0.3s;
        }}

        td:hover {{
            background-color: #eceff1;
        }}
    "#,
        bg = c.bg, border = c.border, text = c.text, highlight = c.highlight,
    )
}

// ─── Table ────────────────────────────────────────────────────────────────────

pub fn table_markup(grid: &Grid, design: Design) -> String {
    let d = design.name();
    let mut html = String::new();
    let _ = write!(html, "<table class=\"{d}\">");
    let _ = write!(
        html,
        "<tr><th colspan=\"7\" class=\"{d} month-header\">{} {}</th></tr>",
        grid.month_name(), grid.year,
    );
    html.push_str("<tr>");
    for label in WEEKDAY_LABELS {
        let _ = write!(html, "<th class=\"{d}\">{label}</th>");
    }
    html.push_str("</tr>");

    for week in grid.weeks() {
        html.push_str("<tr>");
        for cell in week {
            match cell.day {
                None      => { let _ = write!(html, "<td class=\"{d}\"></td>"); }
                Some(day) => {
                    let hl = if cell.highlighted { "highlight" } else { "" };
                    let _ = write!(html, "<td class=\"{d} {hl}\">{day}</td>");
                }
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{Attributes, WidgetAttrs};

    fn attrs(pairs: &[(&str, &str)]) -> WidgetAttrs {
        let map: Attributes = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        WidgetAttrs::from_attributes(&map)
    }

    #[test]
    fn style_uses_size_fractions() {
        let css = style_block(150, Design::Academy);
        assert!(css.contains("width: 150px;"));
        assert!(css.contains("font-size: 10px;"));
        assert!(css.contains("height: 21.428571428571427px;"));
        assert!(css.contains("font-size: 15px;"));
        assert!(css.contains("padding: 3px;"));
        assert!(css.contains("background-color: #f4f4f9;"));
        assert!(css.contains("background-color: #e74c3c;"));
    }

    #[test]
    fn style_follows_design() {
        let css = style_block(150, Design::Minimal);
        assert!(css.contains("border: 1px solid #ddd;"));
        assert!(css.contains("background-color: #007bff;"));
    }

    #[test]
    fn table_has_header_labels_and_weeks() {
        let r = render(&attrs(&[("month", "1"), ("highlight-days", "1,31")]));
        assert!(r.table.starts_with("<table class=\"academy\">"));
        assert!(r.table.contains("<th colspan=\"7\" class=\"academy month-header\">January 2025</th>"));
        assert!(r.table.contains("<th class=\"academy\">Mon</th>"));
        assert!(r.table.contains("<td class=\"academy highlight\">1</td>"));
        assert!(r.table.contains("<td class=\"academy highlight\">31</td>"));
        assert!(r.table.contains("<td class=\"academy \">2</td>"));
        // header + weekday labels + 5 weeks
        assert_eq!(r.table.matches("<tr>").count(), 7);
        assert_eq!(r.table.matches("<td ").count(), 35);
    }

    #[test]
    fn row_count_follows_week_count() {
        // June 2025 starts on a Sunday: six weeks.
        let june = render(&attrs(&[("month", "6")]));
        assert_eq!(june.grid.week_count(), 6);
        assert_eq!(june.table.matches("<tr>").count(), 6 + 2);
        assert_eq!(june.table.matches("<td ").count(), 42);

        // February 2021 starts on a Monday with 28 days: four weeks.
        let feb = render(&attrs(&[("month", "2"), ("year", "2021")]));
        assert_eq!(feb.grid.week_count(), 4);
        assert_eq!(feb.table.matches("<tr>").count(), 4 + 2);
        assert_eq!(feb.table.matches("<td ").count(), 28);
    }

    #[test]
    fn leading_blanks_match_first_weekday() {
        let r = render(&attrs(&[("month", "1"), ("design", "material")]));
        assert!(r.table.contains(
            "<tr><td class=\"material\"></td><td class=\"material\"></td><td class=\"material \">1</td>"
        ));
    }

    #[test]
    fn rich_html_wraps_style() {
        let r = render(&WidgetAttrs::default());
        let html = r.rich_html();
        assert!(html.starts_with("<style>"));
        assert!(html.ends_with("</table>"));
        assert!(r.standalone_document().contains(&html));
    }

    #[test]
    fn embed_tag_lists_canonical_attributes() {
        let r = render(&attrs(&[("month", "02"), ("highlight-days", "3, 1"), ("design", "Vibrant")]));
        assert_eq!(
            r.embed_tag(),
            "<my-calendar month=\"2\" year=\"2025\" size=\"150\" highlight-days=\"1,3\" design=\"vibrant\"></my-calendar>",
        );
    }

    #[test]
    fn attribute_escaping() {
        assert_eq!(escape_attr("a\"<b>&"), "a&quot;&lt;b&gt;&amp;");
    }
}
