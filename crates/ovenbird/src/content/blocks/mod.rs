pub mod process;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One element of heterogeneous rich content. Serialized with an explicit tag
/// so stored page bodies read as `{"type": "heading", "value": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StreamBlock {
    Heading(HeadingBlock),
    Paragraph(ParagraphBlock),
    Image(ImageBlock),
    Quote(QuoteBlock),
    Embed(EmbedBlock),
}

impl StreamBlock {
    pub const fn kind(&self) -> &'static str {
        match self {
            StreamBlock::Heading(_) => "heading",
            StreamBlock::Paragraph(_) => "paragraph",
            StreamBlock::Image(_) => "image",
            StreamBlock::Quote(_) => "quote",
            StreamBlock::Embed(_) => "embed",
        }
    }
}

/// Heading with an editor-selected size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingBlock {
    pub heading_text: String,
    #[serde(default)]
    pub size: HeadingSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingSize {
    #[default]
    H2,
    H3,
    H4,
}

/// Rich text paragraph; the body carries sanitized markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphBlock {
    pub body: String,
}

/// Image with optional caption and attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub image: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub attribution: String,
}

/// Quote attributed to an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteBlock {
    pub text: String,
    #[serde(default)]
    pub attribute_name: String,
}

/// Embedded media referenced by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedBlock {
    pub url: String,
}

/// A single problem found while validating structured content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockViolation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub block: String,
    pub message: String,
}

impl BlockViolation {
    pub fn at(index: usize, block: &str, message: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            block: block.to_string(),
            message: message.into(),
        }
    }

    pub fn counted(block: &str, message: impl Into<String>) -> Self {
        Self {
            index: None,
            block: block.to_string(),
            message: message.into(),
        }
    }
}

/// Bounds on how often a block kind may appear in one stream.
#[derive(Debug, Clone, Copy)]
pub struct CountRule {
    pub block: &'static str,
    pub min: Option<usize>,
    pub max: Option<usize>,
}

/// Checks occurrence counts against the given rules. Kinds missing from the
/// count map are treated as appearing zero times.
pub fn check_counts(
    counts: &BTreeMap<&'static str, usize>,
    rules: &[CountRule],
) -> Vec<BlockViolation> {
    let mut violations = Vec::new();
    for rule in rules {
        let found = counts.get(rule.block).copied().unwrap_or(0);
        if let Some(min) = rule.min {
            if found < min {
                violations.push(BlockViolation::counted(
                    rule.block,
                    format!("expected at least {min} '{}' block(s), found {found}", rule.block),
                ));
            }
        }
        if let Some(max) = rule.max {
            if found > max {
                violations.push(BlockViolation::counted(
                    rule.block,
                    format!("expected at most {max} '{}' block(s), found {found}", rule.block),
                ));
            }
        }
    }
    violations
}

/// Validates one rich content stream block by block.
pub fn validate_stream(blocks: &[StreamBlock]) -> Vec<BlockViolation> {
    let mut violations = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        match block {
            StreamBlock::Heading(heading) => {
                if heading.heading_text.trim().is_empty() {
                    violations.push(BlockViolation::at(
                        index,
                        block.kind(),
                        "heading text is required",
                    ));
                }
            }
            StreamBlock::Paragraph(paragraph) => {
                if paragraph.body.trim().is_empty() {
                    violations.push(BlockViolation::at(
                        index,
                        block.kind(),
                        "paragraph body is required",
                    ));
                }
            }
            StreamBlock::Image(image) => {
                if image.image.trim().is_empty() {
                    violations.push(BlockViolation::at(
                        index,
                        block.kind(),
                        "image reference is required",
                    ));
                }
            }
            StreamBlock::Quote(quote) => {
                if quote.text.trim().is_empty() {
                    violations.push(BlockViolation::at(
                        index,
                        block.kind(),
                        "quote text is required",
                    ));
                }
            }
            StreamBlock::Embed(embed) => {
                let url = embed.url.trim();
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    violations.push(BlockViolation::at(
                        index,
                        block.kind(),
                        "embed URL must start with http:// or https://",
                    ));
                }
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_and_value_tags() {
        let block = StreamBlock::Heading(HeadingBlock {
            heading_text: "Our bakers".to_string(),
            size: HeadingSize::H3,
        });

        let json = serde_json::to_value(&block).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "type": "heading",
                "value": { "heading_text": "Our bakers", "size": "h3" }
            })
        );
    }

    #[test]
    fn valid_blocks_produce_no_violations() {
        let blocks = vec![
            StreamBlock::Heading(HeadingBlock {
                heading_text: "Welcome".to_string(),
                size: HeadingSize::default(),
            }),
            StreamBlock::Paragraph(ParagraphBlock {
                body: "<p>Fresh bread daily.</p>".to_string(),
            }),
            StreamBlock::Embed(EmbedBlock {
                url: "https://example.com/video".to_string(),
            }),
        ];

        assert!(validate_stream(&blocks).is_empty());
    }

    #[test]
    fn reports_blank_and_malformed_blocks_with_positions() {
        let blocks = vec![
            StreamBlock::Quote(QuoteBlock {
                text: "  ".to_string(),
                attribute_name: String::new(),
            }),
            StreamBlock::Embed(EmbedBlock {
                url: "ftp://example.com".to_string(),
            }),
        ];

        let violations = validate_stream(&blocks);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].index, Some(0));
        assert_eq!(violations[0].block, "quote");
        assert_eq!(violations[1].index, Some(1));
        assert!(violations[1].message.contains("http"));
    }

    #[test]
    fn count_rules_flag_missing_and_excess_blocks() {
        let mut counts = BTreeMap::new();
        counts.insert("start", 2usize);

        let violations = check_counts(
            &counts,
            &[
                CountRule {
                    block: "start",
                    min: Some(1),
                    max: Some(1),
                },
                CountRule {
                    block: "end",
                    min: Some(1),
                    max: None,
                },
            ],
        );

        assert_eq!(violations.len(), 2);
        assert!(violations[0].message.contains("at most 1"));
        assert!(violations[1].message.contains("at least 1"));
    }
}
