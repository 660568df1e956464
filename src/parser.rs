use crate::ir::WbsNode;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static INIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%%\{\s*init\s*:\s*(\{.*\})\s*\}%%").unwrap());
static BRACKET_NODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^\s\[\]:]+)\s*\[(.*)\]$").unwrap());
static COLON_NODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^\s\[\]:]+):\s+(.+)$").unwrap());

pub struct ParseOutput {
    pub nodes: Vec<WbsNode>,
    pub init_config: Option<serde_json::Value>,
}

/// Node lists start with `[`; anything else is read as an indented outline.
pub fn parse_input(input: &str) -> Result<ParseOutput> {
    if input.trim_start().starts_with('[') {
        return Ok(ParseOutput {
            nodes: parse_node_list(input)?,
            init_config: None,
        });
    }
    parse_outline(input)
}

/// JSON (or JSON5) array of `{ id, label, parentId }` objects.
pub fn parse_node_list(input: &str) -> Result<Vec<WbsNode>> {
    match serde_json::from_str::<Vec<WbsNode>>(input) {
        Ok(nodes) => Ok(nodes),
        Err(json_err) => json5::from_str::<Vec<WbsNode>>(input).map_err(|json5_err| {
            anyhow::anyhow!("invalid node list: {json_err}; as JSON5: {json5_err}")
        }),
    }
}

/// Indented outline, two spaces per level:
///
/// ```text
/// wbs
/// Root
///   1: Design
///     1.1[Mockups]
///   2: Build
/// ```
///
/// Structure is not validated here; a second unindented line simply yields a second root.
pub fn parse_outline(input: &str) -> Result<ParseOutput> {
    let mut init_config: Option<serde_json::Value> = None;
    let mut nodes: Vec<WbsNode> = Vec::new();
    let mut used_ids: HashSet<String> = HashSet::new();
    let mut stack: Vec<String> = Vec::new();
    let mut base_indent: Option<usize> = None;
    let mut header_allowed = true;

    for raw_line in input.lines() {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(caps) = INIT_RE.captures(trimmed) {
            if let Some(json_str) = caps.get(1).map(|m| m.as_str()) {
                let value = serde_json::from_str::<serde_json::Value>(json_str)
                    .or_else(|_| json5::from_str::<serde_json::Value>(json_str))
                    .map_err(|err| anyhow::anyhow!("invalid init directive: {err}"))?;
                init_config = Some(value);
            }
            continue;
        }
        if trimmed.starts_with("%%") {
            continue;
        }
        if header_allowed {
            header_allowed = false;
            if trimmed.eq_ignore_ascii_case("wbs") {
                continue;
            }
        }

        let indent = count_indent(raw_line);
        let base = *base_indent.get_or_insert(indent);
        let level = (indent.saturating_sub(base) / 2).min(stack.len());

        let (raw_id, label) = parse_node_token(trimmed);
        let id = unique_id(raw_id.unwrap_or_else(|| sanitize_id(&label)), &used_ids, nodes.len());
        used_ids.insert(id.clone());

        stack.truncate(level);
        let parent_id = stack.last().cloned();
        stack.push(id.clone());
        nodes.push(WbsNode { id, label, parent_id });
    }

    if nodes.is_empty() {
        return Err(anyhow::anyhow!("outline contains no nodes"));
    }
    Ok(ParseOutput { nodes, init_config })
}

fn parse_node_token(token: &str) -> (Option<String>, String) {
    if let Some(caps) = BRACKET_NODE_RE.captures(token) {
        return (Some(caps[1].to_string()), caps[2].trim().to_string());
    }
    if let Some(caps) = COLON_NODE_RE.captures(token) {
        return (Some(caps[1].to_string()), caps[2].trim().to_string());
    }
    (None, token.to_string())
}

fn unique_id(candidate: String, used: &HashSet<String>, count: usize) -> String {
    let base = if candidate.is_empty() {
        format!("node_{count}")
    } else {
        candidate
    };
    if !used.contains(&base) {
        return base;
    }
    let mut suffix = count;
    loop {
        let id = format!("{base}_{suffix}");
        if !used.contains(&id) {
            return id;
        }
        suffix += 1;
    }
}

fn sanitize_id(input: &str) -> String {
    let mut out = String::new();
    for ch in input.chars() {
        if ch.is_alphanumeric() || ch == '.' {
            out.push(ch);
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

fn count_indent(line: &str) -> usize {
    let mut count = 0;
    for ch in line.chars() {
        match ch {
            ' ' => count += 1,
            '\t' => count += 2,
            _ => break,
        }
    }
    count
}
