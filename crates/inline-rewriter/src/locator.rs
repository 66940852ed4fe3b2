//! Script segment location by marker attribute.

use regex::Regex;

/// A located script segment.
///
/// Borrowed from the document; created per match and consumed within one
/// rewrite pass.
#[derive(Debug, Clone, Copy)]
pub struct ScriptBlock<'a> {
    /// Opening tag text, attributes included.
    pub header: &'a str,
    /// Text between the opening and closing tags.
    pub body: &'a str,
    /// Byte offset of the segment start within the document.
    pub start: usize,
    /// Byte offset one past the closing tag.
    pub end: usize,
}

/// Locates `<script>` segments whose opening tag carries the marker
/// attribute as a whole token.
///
/// The marker is escaped for literal matching, so attribute strings carrying
/// pattern metacharacters are safe. Matching is non-greedy up to the first
/// closing tag; the body spans newlines, the opening tag does not.
#[derive(Debug)]
pub struct ScriptLocator {
    pattern: Regex,
    marker: String,
}

impl ScriptLocator {
    pub fn new(marker: &str) -> Result<Self, regex::Error> {
        let escaped = regex::escape(marker);
        let pattern = Regex::new(&format!(
            r"(<script.*?\s+{escaped}(?:\s+.*?|)>)((?s:.*?))</script>"
        ))?;
        Ok(Self {
            pattern,
            marker: marker.to_string(),
        })
    }

    /// The raw marker attribute this locator was built for.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// All non-overlapping segments, in document order.
    pub fn segments<'a>(&self, document: &'a str) -> Vec<ScriptBlock<'a>> {
        self.pattern
            .captures_iter(document)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(ScriptBlock {
                    header: caps.get(1)?.as_str(),
                    body: caps.get(2)?.as_str(),
                    start: whole.start(),
                    end: whole.end(),
                })
            })
            .collect()
    }
}
