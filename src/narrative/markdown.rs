use serde::{Deserialize, Serialize};

/// One blank-line separated block of narrative markdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Block {
    /// `## ` block
    Heading(String),
    /// `### ` block
    Subheading(String),
    /// Block starting with a numbered item such as `1.`
    ListItem(String),
    Paragraph(String),
}

impl Block {
    pub fn text(&self) -> &str {
        match self {
            Block::Heading(text)
            | Block::Subheading(text)
            | Block::ListItem(text)
            | Block::Paragraph(text) => text,
        }
    }
}

/// Split narrative markdown into display blocks.
///
/// Blocks are separated by blank lines. Only the block's leading marker
/// decides its kind; the rest of the block is kept as-is.
pub fn split_blocks(markdown: &str) -> Vec<Block> {
    let normalized = markdown.replace("\r\n", "\n");
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in normalized.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(classify_block(&current.join("\n")));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(classify_block(&current.join("\n")));
    }

    blocks
}

fn classify_block(block: &str) -> Block {
    let block = block.trim();

    if let Some(rest) = block.strip_prefix("###") {
        Block::Subheading(rest.trim().to_string())
    } else if let Some(rest) = block.strip_prefix("##") {
        Block::Heading(rest.trim().to_string())
    } else if starts_with_numbered_item(block) {
        Block::ListItem(block.to_string())
    } else {
        Block::Paragraph(block.to_string())
    }
}

fn starts_with_numbered_item(block: &str) -> bool {
    let digits = block.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && block[digits..].starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_report() {
        let markdown = "\n## Threat Intelligence Summary\n\n### Attack Pattern Analysis\n\n\
                        Three campaigns were identified.\n\n\
                        1. **Credential Stuffing** (High)\n   - 437 attempts\n\n\
                        2. Malware downloads\n";

        assert_eq!(
            split_blocks(markdown),
            vec![
                Block::Heading("Threat Intelligence Summary".to_string()),
                Block::Subheading("Attack Pattern Analysis".to_string()),
                Block::Paragraph("Three campaigns were identified.".to_string()),
                Block::ListItem("1. **Credential Stuffing** (High)\n   - 437 attempts".to_string()),
                Block::ListItem("2. Malware downloads".to_string()),
            ]
        );
    }

    #[test]
    fn test_subheading_not_mistaken_for_heading() {
        assert_eq!(
            split_blocks("### Threat Actor Profiling"),
            vec![Block::Subheading("Threat Actor Profiling".to_string())]
        );
    }

    #[test]
    fn test_whitespace_only_lines_separate_blocks() {
        let blocks = split_blocks("first\n   \nsecond\r\n\r\nthird");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].text(), "third");
    }

    #[test]
    fn test_number_without_dot_is_paragraph() {
        assert_eq!(
            split_blocks("2024 was busy"),
            vec![Block::Paragraph("2024 was busy".to_string())]
        );
        assert!(split_blocks("").is_empty());
        assert!(split_blocks("\n\n  \n").is_empty());
    }

    #[test]
    fn test_block_serializes_with_kind() {
        let json = serde_json::to_value(Block::Heading("Summary".to_string())).unwrap();
        assert_eq!(json["kind"], "heading");
        assert_eq!(json["text"], "Summary");
    }
}
