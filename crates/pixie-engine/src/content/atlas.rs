//! Sprite-sheet atlas parsing.
//!
//! Reads the `<TextureAtlas>` XML format written by common sprite packers:
//!
//! ```xml
//! <TextureAtlas imagePath="sheet.png">
//!     <SubTexture name="ship.png" x="224" y="832" width="99" height="75"/>
//! </TextureAtlas>
//! ```
//!
//! Only `SubTexture` elements are read; everything else is skipped.

use thiserror::Error;

use crate::coords::Rect;

/// One named region of a sprite sheet, in texels.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasRegion {
    pub name: String,
    pub source: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtlasError {
    #[error("SubTexture #{element}: missing `{attribute}` attribute")]
    MissingAttribute {
        element: usize,
        attribute: &'static str,
    },

    #[error("SubTexture #{element}: `{attribute}` is not a number: {value:?}")]
    InvalidNumber {
        element: usize,
        attribute: &'static str,
        value: String,
    },

    #[error("SubTexture #{element}: element is not terminated")]
    Unterminated { element: usize },
}

const ELEMENT: &str = "<SubTexture";

/// Extracts every `SubTexture` region in document order.
///
/// Names lose a trailing `.png`. Coordinates must be non-negative integers.
pub fn parse_atlas(xml: &str) -> Result<Vec<AtlasRegion>, AtlasError> {
    let mut regions = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find(ELEMENT) {
        let after = &rest[start + ELEMENT.len()..];
        // `<SubTextureFoo` is a different element.
        if !matches!(after.chars().next(), Some(c) if c.is_whitespace() || c == '/' || c == '>') {
            rest = after;
            continue;
        }

        let element = regions.len();
        let mut scanner = AttrScanner::new(after);
        let attrs = scanner.attributes(element)?;
        rest = &after[scanner.pos..];

        let find = |name: &'static str| {
            attrs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.as_str())
                .ok_or(AtlasError::MissingAttribute {
                    element,
                    attribute: name,
                })
        };
        let number = |name: &'static str| -> Result<f32, AtlasError> {
            let raw = find(name)?;
            raw.trim()
                .parse::<u32>()
                .map(|n| n as f32)
                .map_err(|_| AtlasError::InvalidNumber {
                    element,
                    attribute: name,
                    value: raw.to_string(),
                })
        };

        let raw_name = find("name")?;
        let name = raw_name.strip_suffix(".png").unwrap_or(raw_name).to_string();
        let source = Rect::new(number("x")?, number("y")?, number("width")?, number("height")?);

        regions.push(AtlasRegion { name, source });
    }

    Ok(regions)
}

/// Walks `key="value"` pairs up to the end of one start tag.
struct AttrScanner<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> AttrScanner<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn attributes(&mut self, element: usize) -> Result<Vec<(&'s str, String)>, AtlasError> {
        let unterminated = AtlasError::Unterminated { element };
        let mut attrs = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(unterminated),
                Some('>') => {
                    self.advance();
                    return Ok(attrs);
                }
                Some('/') => {
                    self.advance();
                    if self.advance() != Some('>') {
                        return Err(unterminated);
                    }
                    return Ok(attrs);
                }
                Some(_) => {}
            }

            let key_start = self.pos;
            while matches!(self.peek(), Some(c) if !c.is_whitespace() && c != '=' && c != '>' && c != '/') {
                self.advance();
            }
            let key = &self.src[key_start..self.pos];

            self.skip_whitespace();
            if self.peek() != Some('=') {
                // Bare attribute without a value.
                if key.is_empty() {
                    return Err(unterminated);
                }
                attrs.push((key, String::new()));
                continue;
            }
            self.advance();
            self.skip_whitespace();

            let quote = match self.advance() {
                Some(q @ ('"' | '\'')) => q,
                _ => return Err(unterminated),
            };
            let value_start = self.pos;
            loop {
                match self.advance() {
                    None => return Err(unterminated),
                    Some(c) if c == quote => break,
                    Some(_) => {}
                }
            }
            let value = &self.src[value_start..self.pos - quote.len_utf8()];
            attrs.push((key, unescape(value)));
        }
    }
}

fn unescape(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TextureAtlas imagePath="sheet.png">
    <SubTexture name="beam0.png" x="143" y="377" width="43" height="31"/>
    <SubTexture name="playerShip1_blue.png" x="211" y="941" width="99" height="75"/>
    <SubTexture name='meteor' x = "0" y="0" width="8" height="8" ></SubTexture>
</TextureAtlas>
"#;

    #[test]
    fn reads_regions_in_order() {
        let regions = parse_atlas(SHEET).unwrap();
        let names: Vec<&str> = regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["beam0", "playerShip1_blue", "meteor"]);
        assert_eq!(regions[1].source, Rect::new(211.0, 941.0, 99.0, 75.0));
    }

    #[test]
    fn ignores_other_elements() {
        let xml = r#"<TextureAtlas><SubTextures/><Other x="1"/></TextureAtlas>"#;
        assert!(parse_atlas(xml).unwrap().is_empty());
    }

    #[test]
    fn unescapes_names() {
        let xml = r#"<SubTexture name="a&amp;b.png" x="1" y="2" width="3" height="4"/>"#;
        assert_eq!(parse_atlas(xml).unwrap()[0].name, "a&b");
    }

    #[test]
    fn missing_attribute() {
        let xml = r#"<SubTexture name="a" x="1" y="2" width="3"/>"#;
        assert_eq!(
            parse_atlas(xml),
            Err(AtlasError::MissingAttribute { element: 0, attribute: "height" })
        );
    }

    #[test]
    fn invalid_number() {
        let xml = r#"<SubTexture name="a" x="1" y="2" width="3" height="4"/>
                     <SubTexture name="b" x="-1" y="2" width="3" height="4"/>"#;
        assert_eq!(
            parse_atlas(xml),
            Err(AtlasError::InvalidNumber { element: 1, attribute: "x", value: "-1".into() })
        );
    }

    #[test]
    fn unterminated_element() {
        let xml = r#"<SubTexture name="a" x="1"#;
        assert_eq!(parse_atlas(xml), Err(AtlasError::Unterminated { element: 0 }));
    }
}
