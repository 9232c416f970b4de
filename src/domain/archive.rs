use serde::{Deserialize, Serialize};

/// Where an archive.org item's files live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveLocation {
    pub server: String,
    pub dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPosition {
    #[serde(default)]
    pub page: u32,
}

/// One full-text hit. `text` marks the matched terms as `{{{term}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsideMatch {
    pub text: String,
    #[serde(default)]
    pub par: Vec<MatchPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Highlight(&'a str),
}

impl InsideMatch {
    pub fn page(&self) -> Option<u32> {
        self.par.first().map(|p| p.page)
    }

    /// Split the snippet into plain and highlighted runs.
    ///
    /// An unterminated `{{{` is treated as plain text.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let mut segments = Vec::new();
        let mut rest = self.text.as_str();

        while let Some(start) = rest.find("{{{") {
            let after_open = &rest[start + 3..];
            let Some(end) = after_open.find("}}}") else {
                break;
            };
            if start > 0 {
                segments.push(Segment::Plain(&rest[..start]));
            }
            segments.push(Segment::Highlight(&after_open[..end]));
            rest = &after_open[end + 3..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Plain(rest));
        }
        segments
    }

    /// The snippet with highlight markers replaced by `open`/`close`.
    pub fn render(&self, open: &str, close: &str) -> String {
        self.segments()
            .into_iter()
            .map(|segment| match segment {
                Segment::Plain(text) => text.to_string(),
                Segment::Highlight(text) => format!("{}{}{}", open, text, close),
            })
            .collect()
    }
}

/// Result of a full-text search inside one scanned book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsideSearch {
    #[serde(default)]
    pub ia: String,
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub matches: Vec<InsideMatch>,
}
