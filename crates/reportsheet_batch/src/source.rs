//! Document sources: turn one report file into a rendered table.
//!
//! [`HtmlTableSource`] reads the first `<table>` of an HTML file with a small
//! set of regular expressions. It sees the markup, not a rendered DOM, so
//! tables built by scripts are not found. Other renderers plug in through
//! [`DocumentSource`].

use std::fs;
use std::path::Path;

use regex::{Captures, Regex};
use tracing::debug;

use crate::spec::{DocumentSourceError, SpecRenderedTable};

/// Anything that can render a report file's first table.
pub trait DocumentSource {
    /// `Ok(None)` when the document holds no table.
    fn load_table(&self, path: &Path) -> Result<Option<SpecRenderedTable>, DocumentSourceError>;
}

/// Regex-based reader for static HTML reports.
#[derive(Debug, Clone)]
pub struct HtmlTableSource {
    re_comment: Regex,
    re_script: Regex,
    re_style: Regex,
    re_table_tag: Regex,
    re_tr_open: Regex,
    re_tr_close: Regex,
    re_cell_open: Regex,
    re_cell_boundary: Regex,
    re_whitespace: Regex,
    re_line_break: Regex,
    re_tag: Regex,
    re_entity: Regex,
}

impl HtmlTableSource {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            re_comment: Regex::new(r"(?s)<!--.*?-->")?,
            re_script: Regex::new(r"(?is)<script\b.*?</script\s*>")?,
            re_style: Regex::new(r"(?is)<style\b.*?</style\s*>")?,
            re_table_tag: Regex::new(r"(?i)<(/?)table\b[^>]*>")?,
            re_tr_open: Regex::new(r"(?i)<tr\b[^>]*>")?,
            re_tr_close: Regex::new(r"(?i)</tr\s*>")?,
            re_cell_open: Regex::new(r"(?i)<(td|th)\b[^>]*>")?,
            re_cell_boundary: Regex::new(r"(?i)</?(td|th|tr|thead|tbody|tfoot|table)\b")?,
            re_whitespace: Regex::new(r"\s+")?,
            re_line_break: Regex::new(r"(?i)<br\s*/?>|</?(p|div|li)\b[^>]*>")?,
            re_tag: Regex::new(r"<[^>]*>")?,
            re_entity: Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);")?,
        })
    }

    /// Parse the first table of an HTML document.
    pub fn parse_table(&self, html: &str) -> Option<SpecRenderedTable> {
        let c_html = self.re_comment.replace_all(html, "");
        let c_html = self.re_script.replace_all(&c_html, "");
        let c_html = self.re_style.replace_all(&c_html, "");

        let c_table = self.slice_first_table(&c_html)?;
        let header_cells = self.collect_cells(c_table, "th");
        let rows = self
            .slice_rows(c_table)
            .into_iter()
            .map(|c_row| self.collect_cells(c_row, "td"))
            .collect();

        Some(SpecRenderedTable { header_cells, rows })
    }

    /// Inner markup of the first top-level table; nested tables stay inside.
    fn slice_first_table<'a>(&self, html: &'a str) -> Option<&'a str> {
        let mut n_start: Option<usize> = None;
        let mut n_depth = 0usize;
        for caps in self.re_table_tag.captures_iter(html) {
            let (Some(m_tag), Some(m_slash)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let if_closing = !m_slash.as_str().is_empty();
            match (n_start, if_closing) {
                (None, false) => {
                    n_start = Some(m_tag.end());
                    n_depth = 1;
                }
                (None, true) => {}
                (Some(_), false) => n_depth += 1,
                (Some(n_start), true) => {
                    n_depth -= 1;
                    if n_depth == 0 {
                        return Some(&html[n_start..m_tag.start()]);
                    }
                }
            }
        }
        n_start.map(|n_start| &html[n_start..])
    }

    /// Markup of each `tr`, from its opening tag to `</tr>` or the next `tr`.
    fn slice_rows<'a>(&self, table: &'a str) -> Vec<&'a str> {
        let l_bounds: Vec<(usize, usize)> = self
            .re_tr_open
            .find_iter(table)
            .map(|m| (m.start(), m.end()))
            .collect();

        l_bounds
            .iter()
            .enumerate()
            .map(|(n_idx, &(_, n_content_start))| {
                let n_next = l_bounds
                    .get(n_idx + 1)
                    .map_or(table.len(), |&(n_next_start, _)| n_next_start);
                let c_row = &table[n_content_start..n_next];
                match self.re_tr_close.find(c_row) {
                    Some(m) => &c_row[..m.start()],
                    None => c_row,
                }
            })
            .collect()
    }

    /// Rendered text of every `tag` cell in `fragment`, in document order.
    fn collect_cells(&self, fragment: &str, tag: &str) -> Vec<String> {
        self.re_cell_open
            .captures_iter(fragment)
            .filter(|caps| caps.get(1).is_some_and(|m| m.as_str().eq_ignore_ascii_case(tag)))
            .filter_map(|caps| caps.get(0))
            .map(|m_open| {
                let c_rest = &fragment[m_open.end()..];
                let n_end = self
                    .re_cell_boundary
                    .find(c_rest)
                    .map_or(c_rest.len(), |m| m.start());
                self.render_text(&c_rest[..n_end])
            })
            .collect()
    }

    /// Visible text of a markup fragment, one rendered line per line.
    fn render_text(&self, fragment: &str) -> String {
        let c_text = self.re_whitespace.replace_all(fragment, " ");
        let c_text = self.re_line_break.replace_all(&c_text, "\n");
        let c_text = self.re_tag.replace_all(&c_text, "");
        let c_text = self.re_entity.replace_all(&c_text, |caps: &Captures| decode_entity(caps));

        c_text
            .lines()
            .map(|line| self.re_whitespace.replace_all(line, " ").trim().to_string())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DocumentSource for HtmlTableSource {
    fn load_table(&self, path: &Path) -> Result<Option<SpecRenderedTable>, DocumentSourceError> {
        let bytes = fs::read(path).map_err(|source| DocumentSourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = self.parse_table(&String::from_utf8_lossy(&bytes));
        debug!(
            path = %path.display(),
            if_found = table.is_some(),
            n_rows = table.as_ref().map_or(0, |t| t.rows.len()),
            "loaded report table"
        );
        Ok(table)
    }
}

fn decode_entity(caps: &Captures) -> String {
    let c_raw = caps.get(0).map_or("", |m| m.as_str());
    let c_body = caps.get(1).map_or("", |m| m.as_str());

    let ch = if let Some(c_hex) = c_body
        .strip_prefix("#x")
        .or_else(|| c_body.strip_prefix("#X"))
    {
        u32::from_str_radix(c_hex, 16).ok().and_then(char::from_u32)
    } else if let Some(c_dec) = c_body.strip_prefix('#') {
        c_dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        match c_body {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ => None,
        }
    };

    ch.map_or_else(|| c_raw.to_string(), |ch| ch.to_string())
}
