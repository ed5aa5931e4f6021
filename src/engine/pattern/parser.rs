// ==========================================
// 命名模式 - 递归下降解析
// ==========================================
// 语法（逗号分隔，括号内逗号归属该分组）:
//   seg    := group | flat
//   group  := flat "(" list ")"        父节点 + 子节点
//           | flat "*(" list ")"       flat 展开为多个父节点，逐个展开子节点
//   flat   := (literal | "{" N "}" | "[" N "]")*
//   子项以 "+" 开头时，"+" 代表父节点名称
// 位置均为字节偏移（从 0 开始）
// ==========================================

use crate::domain::LocationNode;
use crate::engine::error::{EngineError, EngineResult};

/// 字母标签上限（A..Z）
pub const MAX_LETTER_COUNT: u32 = 26;

/// 单个模式展开出的节点总数上限
pub const MAX_EXPANDED_NODES: usize = 10_000;

/// 整体括号配对检查
pub(super) fn check_balance(pattern: &str) -> EngineResult<()> {
    let mut stack: Vec<(char, usize)> = Vec::new();

    for (pos, ch) in pattern.char_indices() {
        match ch {
            '{' | '[' | '(' => stack.push((ch, pos)),
            '}' | ']' | ')' => {
                let expected = match ch {
                    '}' => '{',
                    ']' => '[',
                    _ => '(',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, open_pos)) => {
                        return Err(EngineError::syntax(
                            pos,
                            format!("'{}' 与位置 {} 的 '{}' 不匹配", ch, open_pos, open),
                        ));
                    }
                    None => {
                        return Err(EngineError::syntax(pos, format!("多余的 '{}'", ch)));
                    }
                }
            }
            _ => {}
        }
    }

    match stack.pop() {
        Some((open, pos)) => Err(EngineError::syntax(pos, format!("'{}' 未闭合", open))),
        None => Ok(()),
    }
}

/// 按顶层逗号切分，去除首尾空白并丢弃空段
///
/// 返回 (段在原串中的偏移, 段内容)
pub(super) fn split_top_level(s: &str, offset: usize) -> Vec<(usize, &str)> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, ch) in s.char_indices() {
        match ch {
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                push_trimmed(&mut segments, s, start, i, offset);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_trimmed(&mut segments, s, start, s.len(), offset);

    segments
}

fn push_trimmed<'a>(
    out: &mut Vec<(usize, &'a str)>,
    s: &'a str,
    start: usize,
    end: usize,
    offset: usize,
) {
    let raw = &s[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start().len();
    out.push((offset + start + lead, trimmed));
}

// ==========================================
// 列表 / 段
// ==========================================

/// 展开逗号分隔的列表
///
/// `parent` 为 `*(...)` 或 `(...)` 分组所属父节点名，供 "+" 引用
pub(super) fn expand_list(
    s: &str,
    offset: usize,
    parent: Option<&str>,
    budget: &mut usize,
) -> EngineResult<Vec<LocationNode>> {
    let mut nodes = Vec::new();
    for (seg_offset, seg) in split_top_level(s, offset) {
        nodes.extend(expand_segment(seg, seg_offset, parent, budget)?);
    }
    Ok(nodes)
}

fn expand_segment(
    seg: &str,
    offset: usize,
    parent: Option<&str>,
    budget: &mut usize,
) -> EngineResult<Vec<LocationNode>> {
    // "+" 代表父节点名称
    let (seg, offset, prefix) = match (seg.strip_prefix('+'), parent) {
        (Some(rest), Some(p)) => (rest, offset + 1, p),
        (Some(_), None) => {
            return Err(EngineError::syntax(offset, "'+' 只能出现在分组内部"));
        }
        (None, _) => (seg, offset, ""),
    };

    let Some(open) = find_top_level_group(seg) else {
        let names = expand_flat(seg, offset, prefix)?;
        consume_budget(budget, names.len(), offset)?;
        return Ok(names.into_iter().map(LocationNode::leaf).collect());
    };

    let close = matching_paren(seg, open)
        .ok_or_else(|| EngineError::syntax(offset + open, "'(' 未闭合"))?;
    if close != seg.len() - 1 {
        return Err(EngineError::syntax(
            offset + close + 1,
            "分组 ')' 之后不允许出现其他字符",
        ));
    }

    let head = &seg[..open];
    let inner = &seg[open + 1..close];
    let inner_offset = offset + open + 1;

    let (base, repeat) = match head.strip_suffix('*') {
        Some(base) => (base, true),
        None => (head, false),
    };

    if !repeat && (base.contains('{') || base.contains('[')) {
        return Err(EngineError::syntax(
            offset,
            "分组名称含 {n}/[n] 时请使用 base*(...) 形式",
        ));
    }

    let parents = expand_flat(base, offset, prefix)?;
    if parents.iter().any(|p| p.is_empty()) {
        return Err(EngineError::syntax(offset, "分组缺少父节点名称"));
    }
    consume_budget(budget, parents.len(), offset)?;

    let mut nodes = Vec::with_capacity(parents.len());
    for parent_name in parents {
        let children = expand_list(inner, inner_offset, Some(&parent_name), budget)?;
        nodes.push(LocationNode::branch(parent_name, children));
    }
    Ok(nodes)
}

fn consume_budget(budget: &mut usize, count: usize, offset: usize) -> EngineResult<()> {
    if count > *budget {
        return Err(EngineError::capacity(
            format!("模式展开节点数 (位置 {})", offset),
            (MAX_EXPANDED_NODES - *budget + count) as u64,
            MAX_EXPANDED_NODES as u64,
        ));
    }
    *budget -= count;
    Ok(())
}

/// 段内第一个顶层 '(' 的位置
fn find_top_level_group(seg: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in seg.char_indices() {
        match ch {
            '(' if depth == 0 => return Some(i),
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

fn matching_paren(seg: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in seg[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

// ==========================================
// 扁平段: 字面量与 {N} / [N] 的笛卡尔积
// ==========================================

enum Token<'a> {
    Literal(&'a str),
    Number(u32),
    Letter(u32),
}

fn tokenize(s: &str, offset: usize) -> EngineResult<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut literal_start = 0usize;
    let mut i = 0usize;
    let bytes = s.as_bytes();

    while i < bytes.len() {
        let (close_ch, is_number) = match bytes[i] {
            b'{' => ('}', true),
            b'[' => (']', false),
            b'}' | b']' | b'(' | b')' => {
                return Err(EngineError::syntax(
                    offset + i,
                    format!("无法识别的 '{}'", bytes[i] as char),
                ));
            }
            _ => {
                i += 1;
                continue;
            }
        };

        if literal_start < i {
            tokens.push(Token::Literal(&s[literal_start..i]));
        }

        let close = s[i + 1..]
            .find(close_ch)
            .map(|p| i + 1 + p)
            .ok_or_else(|| EngineError::syntax(offset + i, format!("缺少 '{}'", close_ch)))?;
        let count = parse_count(&s[i + 1..close], offset + i + 1)?;

        if is_number {
            tokens.push(Token::Number(count));
        } else {
            if count > MAX_LETTER_COUNT {
                return Err(EngineError::capacity(
                    "字母标签数",
                    u64::from(count),
                    u64::from(MAX_LETTER_COUNT),
                ));
            }
            tokens.push(Token::Letter(count));
        }

        i = close + 1;
        literal_start = i;
    }

    if literal_start < s.len() {
        tokens.push(Token::Literal(&s[literal_start..]));
    }
    Ok(tokens)
}

fn parse_count(raw: &str, offset: usize) -> EngineResult<u32> {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(EngineError::syntax(offset, "数量必须为正整数")),
        Err(_) => Err(EngineError::syntax(
            offset,
            format!("无法识别的数量 '{}'", trimmed),
        )),
    }
}

/// 展开扁平段，左侧符号为高位（数字优先于其后的字母）
pub(super) fn expand_flat(s: &str, offset: usize, prefix: &str) -> EngineResult<Vec<String>> {
    let mut names = vec![prefix.to_string()];

    for token in tokenize(s, offset)? {
        names = match token {
            Token::Literal(lit) => names.into_iter().map(|n| n + lit).collect(),
            Token::Number(count) => {
                check_product(names.len(), count)?;
                let width = count.to_string().len();
                cartesian(&names, (1..=count).map(|i| format!("{:0width$}", i, width = width)))
            }
            Token::Letter(count) => {
                check_product(names.len(), count)?;
                cartesian(&names, (0..count).map(letter_label))
            }
        };
    }

    Ok(names)
}

/// 笛卡尔积规模须在生成名称之前确认不超过节点上限
fn check_product(bases: usize, count: u32) -> EngineResult<()> {
    let requested = bases
        .checked_mul(count as usize)
        .unwrap_or(usize::MAX);
    if requested > MAX_EXPANDED_NODES {
        return Err(EngineError::capacity(
            "模式展开节点数",
            requested as u64,
            MAX_EXPANDED_NODES as u64,
        ));
    }
    Ok(())
}

fn cartesian<I>(bases: &[String], suffixes: I) -> Vec<String>
where
    I: Iterator<Item = String> + Clone,
{
    bases
        .iter()
        .flat_map(|base| suffixes.clone().map(move |s| format!("{}{}", base, s)))
        .collect()
}

/// 0 → "A", 1 → "B" …（调用方保证 index < 26）
pub(crate) fn letter_label(index: u32) -> String {
    char::from(b'A' + index as u8).to_string()
}
