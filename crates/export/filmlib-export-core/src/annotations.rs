//! Annotation tree built from timeline markers and an outline text.
//!
//! The text is split into blank-line separated blocks. A block counts only
//! when it opens with a dotted numeric id such as `1.` or `1.2.1.`; the i-th
//! such block covers the time between marker i and marker i+1.

use indexmap::IndexMap;

use filmlib_api_core::MarkerData;

use crate::clip::AnnotationNode;

/// Trimmed, non-empty blocks separated by blank lines.
pub fn text_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in content.split('\n') {
        if line.trim().is_empty() {
            close_block(&mut blocks, &mut current);
        } else {
            current.push(line);
        }
    }
    close_block(&mut blocks, &mut current);
    blocks
}

fn close_block(blocks: &mut Vec<String>, lines: &mut Vec<&str>) {
    let block = lines.join("\n");
    let block = block.trim();
    if !block.is_empty() {
        blocks.push(block.to_string());
    }
    lines.clear();
}

/// `(id, text)` when the block starts with a valid id token.
pub fn parse_block(block: &str) -> Option<(String, String)> {
    let (token, text) = match block.find(char::is_whitespace) {
        Some(i) => {
            let rest = &block[i..];
            let ws = rest.chars().next().map_or(0, char::len_utf8);
            (&block[..i], &rest[ws..])
        }
        None => (block, ""),
    };
    is_id_token(token).then(|| (token.to_string(), text.to_string()))
}

fn is_id_token(token: &str) -> bool {
    let Some(body) = token.strip_suffix('.') else {
        return false;
    };
    body.split('.')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

/// Id with its last segment removed; `None` for a top-level id.
pub fn parent_id(id: &str) -> Option<String> {
    let body = id.strip_suffix('.')?;
    let (parent, _) = body.rsplit_once('.')?;
    Some(format!("{parent}."))
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Forest of annotation nodes, or empty when there are fewer than two
/// markers or no qualifying block. Times are absolute seconds at `fps`.
/// Nodes whose parent id is absent become roots.
pub fn build_tree(markers: &[MarkerData], content: &str, fps: f64) -> Vec<AnnotationNode> {
    if markers.len() < 2 || !fps.is_finite() || fps <= 0.0 {
        return Vec::new();
    }
    let mut sorted = markers.to_vec();
    sorted.sort_by_key(|m| m.frame);

    let parsed: Vec<(String, String)> = text_blocks(content)
        .iter()
        .filter_map(|b| parse_block(b))
        .collect();

    let mut flat: IndexMap<String, AnnotationNode> = IndexMap::new();
    for (pair, (id, text)) in sorted.windows(2).zip(parsed) {
        let node = AnnotationNode {
            id: id.clone(),
            start: round2(f64::from(pair[0].frame) / fps),
            end: round2(f64::from(pair[1].frame) / fps),
            text,
            children: Vec::new(),
        };
        flat.insert(id, node);
    }

    let parent_of: IndexMap<String, Option<String>> = flat
        .keys()
        .map(|id| {
            let parent = parent_id(id).filter(|p| flat.contains_key(p));
            (id.clone(), parent)
        })
        .collect();

    let roots: Vec<String> = parent_of
        .iter()
        .filter(|(_, p)| p.is_none())
        .map(|(id, _)| id.clone())
        .collect();
    roots
        .iter()
        .filter_map(|id| attach(id, &mut flat, &parent_of))
        .collect()
}

fn attach(
    id: &str,
    flat: &mut IndexMap<String, AnnotationNode>,
    parent_of: &IndexMap<String, Option<String>>,
) -> Option<AnnotationNode> {
    let mut node = flat.shift_remove(id)?;
    let children: Vec<String> = parent_of
        .iter()
        .filter(|(_, p)| p.as_deref() == Some(id))
        .map(|(c, _)| c.clone())
        .collect();
    node.children = children
        .iter()
        .filter_map(|c| attach(c, flat, parent_of))
        .collect();
    Some(node)
}
