// Copyright (c) 2017 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0
//
// Subject to the condition set forth below, permission is hereby granted to any person obtaining a
// copy of this software, associated documentation and/or data (collectively the "Software"), free
// of charge and under any and all copyright rights in the Software, and any and all patent rights
// owned or freely licensable by each licensor hereunder covering either (i) the unmodified
// Software as contributed to or provided by such licensor, or (ii) the Larger Works (as defined
// below), to deal in both
//
// (a) the Software, and
// (b) any piece of software and/or hardware listed in the lrgrwrks.txt file
// if one is included with the Software (each a "Larger Work" to which the Software is contributed
// by such licensors),
//
// without restriction, including without limitation the rights to copy, create derivative works
// of, display, perform, and distribute the Software and make, use, sell, offer for sale, import,
// export, have made, and have sold the Software and the Larger Work(s), and to sublicense the
// foregoing rights on either these or other terms.
//
// This license is subject to the following condition: The above copyright notice and either this
// complete permission notice or at a minimum a reference to the UPL must be included in all copies
// or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Grammar-directed tree builders, one per dialect. Each takes the already
//! comment-stripped, tab-expanded body of a file (the diff variant has already had its
//! first line, the target path, peeled off by the caller) and produces a flat, ordered
//! sequence of top-level [`Node`]s.

use dlpatch_cache::StringCache;

use crate::error::{ParseError, ParseResult};
use crate::flags::Flag;
use crate::lexer::{all_word_char, validate_braces, validate_parens, Scanner};
use crate::node::Node;
use crate::signature;

/// The four script dialects this builder understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileType {
    Scr,
    Def,
    Loot,
    Varlist,
}

/// Deduces a dialect from a diff's declared target path (its first line).
pub fn deduce_file_type(target_path: &str) -> ParseResult<FileType> {
    let basename = target_path.rsplit('/').next().unwrap_or(target_path);
    if basename.eq_ignore_ascii_case("varlist.scr") {
        return Ok(FileType::Varlist);
    }
    match basename.rsplit_once('.') {
        Some((_, "scr")) => Ok(FileType::Scr),
        Some((_, "def")) => Ok(FileType::Def),
        Some((_, "loot")) => Ok(FileType::Loot),
        _ => Err(ParseError::syntax(None, format!("cannot deduce file type from path `{target_path}`"))),
    }
}

/// Builds the top-level node sequence for `body` according to `file_type`. `start_line` is
/// the 1-based line `body` itself starts on in the original file (2 for a diff body, whose
/// first line — the target path — has already been peeled off by the caller; 1 for a
/// target, whose first line is already content).
pub fn build_tree(file_type: FileType, body: &str, is_diff: bool, start_line: u64, cache: &mut StringCache) -> ParseResult<Vec<Node>> {
    validate_braces(body)
        .map_err(|line| ParseError::syntax(Some(line + start_line - 1), "mismatched braces"))?;
    validate_parens(body)
        .map_err(|line| ParseError::syntax(Some(line + start_line - 1), "mismatched parentheses"))?;

    let mut sc = Scanner::new_at_line(body, start_line);
    match file_type {
        FileType::Scr => build_scr(&mut sc, is_diff, cache),
        FileType::Def => build_def(&mut sc, is_diff, cache),
        FileType::Loot => build_loot(&mut sc, is_diff, cache),
        FileType::Varlist => build_varlist(&mut sc, is_diff, cache),
    }
}

fn read_attribute_tags(sc: &mut Scanner, line: u64) -> ParseResult<Flag> {
    let mut flags = Flag::empty();
    loop {
        sc.skip_ws();
        if sc.peek() != Some(b'[') {
            break;
        }
        let tag = sc
            .read_balanced('[', ']')
            .ok_or_else(|| ParseError::syntax(Some(line), "unterminated attribute tag"))?;
        let bit = match tag.trim().to_ascii_lowercase().as_str() {
            "noop" => Flag::NOOP,
            "insert" => Flag::INSERT,
            "rename" => Flag::RENAME,
            "redefine" => Flag::REDEFINE,
            "delete" => Flag::DELETE,
            other => return Err(ParseError::syntax(Some(line), format!("unknown attribute tag `[{other}]`"))),
        };
        flags |= bit;
    }
    Ok(flags)
}

fn finish_diff_edits(flags: Flag) -> Flag {
    if flags.edit_bits().is_empty() {
        flags | Flag::NOOP
    } else {
        flags
    }
}

fn check_forbidden(kind: Flag, edits: Flag, forbidden: Flag, line: u64) -> ParseResult<()> {
    if edits.intersects(forbidden) {
        return Err(ParseError::semantic(
            Some(line),
            format!("{kind:?} node cannot carry edit flags {:?}", edits & forbidden),
        ));
    }
    Ok(())
}

fn consume_terminator(sc: &mut Scanner, line: u64) -> ParseResult<()> {
    sc.skip_ws();
    if !sc.consume_char(';') {
        return Err(ParseError::syntax(Some(line), "expected `;`"));
    }
    Ok(())
}

fn read_quoted(sc: &mut Scanner, line: u64) -> ParseResult<String> {
    sc.skip_ws();
    let s = sc
        .read_quoted_string()
        .ok_or_else(|| ParseError::syntax(Some(line), "expected a quoted string"))?;
    Ok(s.to_string())
}

fn read_until<'a>(sc: &mut Scanner<'a>, stop: u8) -> &'a str {
    sc.read_while(|c| c != stop)
}

// ---------------------------------------------------------------------------------------
// import / export
// ---------------------------------------------------------------------------------------

fn parse_import(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Option<Node>> {
    let line = sc.line;
    sc.skip_ws();
    if !sc.consume_str("import") {
        return Err(ParseError::syntax(Some(line), "expected `import`"));
    }
    let path = read_quoted(sc, line)?;
    let canon = signature::canonicalize_import(&path, line)?;
    let sig_id = cache.find_or_add(canon.clone());

    let mut node = Node::new(Flag::IMPORT, sig_id, sig_id, line);
    if is_diff {
        let mut edits = read_attribute_tags(sc, line)?;
        edits = finish_diff_edits(edits);
        check_forbidden(Flag::IMPORT, edits, Flag::import_forbidden(), line)?;
        if edits.contains(Flag::RENAME) {
            sc.skip_ws();
            if !sc.consume_str("import") {
                return Err(ParseError::syntax(Some(line), "rename payload must be another import"));
            }
            let new_path = read_quoted(sc, line)?;
            let new_canon = signature::canonicalize_import(&new_path, line)?;
            node.new_sig_id = cache.find_or_add(new_canon);
        }
        node.flags = Flag::IMPORT | edits;
        if edits == Flag::NOOP {
            return Ok(None);
        }
    }
    Ok(Some(node))
}

fn parse_export(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Option<Node>> {
    let line = sc.line;
    sc.skip_ws();
    if !sc.consume_str("export") {
        return Err(ParseError::syntax(Some(line), "expected `export`"));
    }
    sc.skip_ws();
    let ty = sc
        .read_identifier()
        .ok_or_else(|| ParseError::syntax(Some(line), "expected export type"))?
        .to_string();
    sc.skip_ws();
    let name = sc
        .read_identifier()
        .ok_or_else(|| ParseError::syntax(Some(line), "expected export name"))?
        .to_string();
    let compare = cache.find_or_add(signature::export_compare_signature(&ty, &name));

    if !is_diff {
        // a target (or `def`'s own declaration) always carries a concrete value.
        sc.skip_ws();
        if !sc.consume_char('=') {
            return Err(ParseError::syntax(Some(line), "expected `=` in export"));
        }
        sc.skip_ws();
        let value = read_until(sc, b';').trim().to_string();
        let canon = signature::canonicalize_export(&ty, &name, &value, line)?;
        let sig_id = cache.find_or_add(canon);
        consume_terminator(sc, line)?;
        return Ok(Some(Node::new(Flag::EXPORT, sig_id, compare, line)));
    }

    // a diff export's value is only meaningful as a `[redefine]` payload; its identity is
    // `compare` (type+name) either way, so the base value is optional.
    sc.skip_ws();
    let mut sig_id = compare;
    if sc.consume_char('=') {
        sc.skip_ws();
        let value = read_until(sc, b'[').trim_end().to_string();
        let value = if value.ends_with(';') { value.trim_end_matches(';').trim_end().to_string() } else { value };
        sig_id = cache.find_or_add(signature::canonicalize_export(&ty, &name, &value, line)?);
    }
    let mut node = Node::new(Flag::EXPORT, sig_id, compare, line);
    let edits = finish_diff_edits(read_attribute_tags(sc, line)?);
    check_forbidden(Flag::EXPORT, edits, Flag::export_forbidden(), line)?;
    if edits.contains(Flag::REDEFINE) {
        sc.skip_ws();
        sc.consume_char('=');
        sc.skip_ws();
        let new_value = read_until(sc, b';').trim().to_string();
        signature::canonicalize_export(&ty, &name, &new_value, line)?;
        node.new_sig_id = cache.find_or_add(new_value);
    }
    node.flags = Flag::EXPORT | edits;
    consume_terminator(sc, line)?;
    if edits == Flag::NOOP {
        return Ok(None);
    }
    Ok(Some(node))
}

// ---------------------------------------------------------------------------------------
// use statement / function call / nested scopes
// ---------------------------------------------------------------------------------------

fn parse_use(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Option<Node>> {
    let line = sc.line;
    sc.skip_ws();
    if !sc.consume_str("use") {
        return Err(ParseError::syntax(Some(line), "expected `use`"));
    }
    sc.skip_ws();
    let name = sc
        .read_identifier()
        .ok_or_else(|| ParseError::syntax(Some(line), "expected use target"))?
        .to_string();
    sc.skip_ws();
    let inner = sc
        .read_balanced('(', ')')
        .ok_or_else(|| ParseError::syntax(Some(line), "expected `()` after use target"))?
        .to_string();
    let canon = signature::canonicalize_use(&name, &inner, line)?;
    let sig_id = cache.find_or_add(canon);

    let mut node = Node::new(Flag::USE, sig_id, sig_id, line);
    if is_diff {
        let mut edits = read_attribute_tags(sc, line)?;
        edits = finish_diff_edits(edits);
        if edits.contains(Flag::RENAME) {
            sc.skip_ws();
            if !sc.consume_str("use") {
                return Err(ParseError::syntax(Some(line), "rename payload must be another use statement"));
            }
            sc.skip_ws();
            let new_name = sc
                .read_identifier()
                .ok_or_else(|| ParseError::syntax(Some(line), "expected renamed use target"))?
                .to_string();
            sc.skip_ws();
            let new_inner = sc
                .read_balanced('(', ')')
                .ok_or_else(|| ParseError::syntax(Some(line), "expected `()` after renamed use target"))?
                .to_string();
            let new_canon = signature::canonicalize_use(&new_name, &new_inner, line)?;
            node.new_sig_id = cache.find_or_add(new_canon);
        }
        node.flags = Flag::USE | edits;
    }
    consume_terminator(sc, line)?;
    if is_diff && node.edits() == Flag::NOOP {
        return Ok(None);
    }
    Ok(Some(node))
}

fn parse_function_call(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Node> {
    let line = sc.line;
    sc.skip_ws();
    let name = sc
        .read_identifier()
        .ok_or_else(|| ParseError::syntax(Some(line), "expected function name"))?
        .to_string();
    sc.skip_ws();
    let args_text = sc
        .read_balanced('(', ')')
        .ok_or_else(|| ParseError::syntax(Some(line), "expected `(...)` after function name"))?
        .to_string();
    let canon = signature::canonicalize_function_call(&name, &args_text, line)?;
    let sig_id = cache.find_or_add(canon);
    let mut node = Node::new(Flag::FUNCTION, sig_id, sig_id, line);

    let mut edits = Flag::empty();
    if is_diff {
        edits = finish_diff_edits(read_attribute_tags(sc, line)?);
        if edits.contains(Flag::RENAME) {
            sc.skip_ws();
            let new_name = sc
                .read_identifier()
                .ok_or_else(|| ParseError::syntax(Some(line), "expected renamed function name"))?
                .to_string();
            sc.skip_ws();
            let new_args = sc
                .read_balanced('(', ')')
                .ok_or_else(|| ParseError::syntax(Some(line), "expected `(...)` after renamed function name"))?
                .to_string();
            let new_canon = signature::canonicalize_function_call(&new_name, &new_args, line)?;
            node.new_sig_id = cache.find_or_add(new_canon);
        }
        node.flags = Flag::FUNCTION | edits;
    }

    sc.skip_ws();
    if sc.peek() == Some(b'{') {
        node.children = parse_block(sc, is_diff, cache)?;
        return Ok(node);
    }
    consume_terminator(sc, line)?;
    Ok(node)
}

/// One statement inside a scope: a `use` or a function call (which may itself have a nested
/// body). Returns `None` for a diff-only node that collapsed to a no-op with no children.
fn parse_statement(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Option<Node>> {
    sc.skip_ws();
    if sc.starts_with("use") && !matches!(sc.peek_at(3), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
        return parse_use(sc, is_diff, cache);
    }
    let node = parse_function_call(sc, is_diff, cache)?;
    if is_diff && node.edits() == Flag::NOOP && node.children.is_empty() {
        return Ok(None);
    }
    Ok(Some(node))
}

fn parse_block(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Vec<Node>> {
    let line = sc.line;
    let inner = sc
        .read_balanced('{', '}')
        .ok_or_else(|| ParseError::syntax(Some(line), "expected `{...}` block"))?
        .to_string();
    let mut inner_sc = Scanner::new(&inner);
    let mut children = Vec::new();
    loop {
        inner_sc.skip_ws();
        if inner_sc.eof() {
            break;
        }
        if let Some(stmt) = parse_statement(&mut inner_sc, is_diff, cache)? {
            children.push(stmt);
        }
    }
    Ok(children)
}

// ---------------------------------------------------------------------------------------
// sub scope (scr root) / sub declaration (loot)
// ---------------------------------------------------------------------------------------

fn parse_sub_scope(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Node> {
    let line = sc.line;
    sc.skip_ws();
    if !sc.consume_str("sub") {
        return Err(ParseError::syntax(Some(line), "expected `sub`"));
    }
    sc.skip_ws();
    let name = sc
        .read_identifier()
        .ok_or_else(|| ParseError::syntax(Some(line), "expected sub name"))?
        .to_string();
    sc.skip_ws();
    let inner = sc
        .read_balanced('(', ')')
        .ok_or_else(|| ParseError::syntax(Some(line), "expected `()` after sub name"))?
        .to_string();
    if !inner.trim().is_empty() {
        return Err(ParseError::syntax(Some(line), "the root sub scope takes no parameters"));
    }
    let canon = signature::canonicalize_sub_scope(&name, line)?;
    let sig_id = cache.find_or_add(canon);
    let mut node = Node::new(Flag::SUB_SCOPE, sig_id, sig_id, line);

    if is_diff {
        let edits = read_attribute_tags(sc, line)?;
        check_forbidden(
            Flag::SUB_SCOPE,
            edits,
            Flag::INSERT | Flag::RENAME | Flag::DELETE,
            line,
        )?;
        node.flags = Flag::SUB_SCOPE | finish_diff_edits(edits);
    }
    sc.skip_ws();
    node.children = parse_block(sc, is_diff, cache)?;
    Ok(node)
}

fn parse_sub_declaration(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Node> {
    let line = sc.line;
    sc.skip_ws();
    if !sc.consume_str("sub") {
        return Err(ParseError::syntax(Some(line), "expected `sub`"));
    }
    sc.skip_ws();
    let name = sc
        .read_identifier()
        .ok_or_else(|| ParseError::syntax(Some(line), "expected sub name"))?
        .to_string();
    sc.skip_ws();
    let params = sc
        .read_balanced('(', ')')
        .ok_or_else(|| ParseError::syntax(Some(line), "expected `(...)` after sub name"))?
        .to_string();
    let canon = signature::canonicalize_sub_declaration(&name, &params, line)?;
    let sig_id = cache.find_or_add(canon);
    let mut node = Node::new(Flag::SUB_DECLARATION, sig_id, sig_id, line);

    if is_diff {
        let edits = read_attribute_tags(sc, line)?;
        check_forbidden(Flag::SUB_DECLARATION, edits, Flag::sub_declaration_forbidden(), line)?;
        node.flags = Flag::SUB_DECLARATION | finish_diff_edits(edits);
    }
    sc.skip_ws();
    node.children = parse_block(sc, is_diff, cache)?;
    Ok(node)
}

// ---------------------------------------------------------------------------------------
// varlist: !include(...) / Var*(...)
// ---------------------------------------------------------------------------------------

fn parse_include(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Option<Node>> {
    let line = sc.line;
    sc.skip_ws();
    if !sc.consume_str("!include") {
        return Err(ParseError::syntax(Some(line), "expected `!include`"));
    }
    sc.skip_ws();
    let inner = sc
        .read_balanced('(', ')')
        .ok_or_else(|| ParseError::syntax(Some(line), "expected `(...)` after !include"))?
        .to_string();
    let canon = signature::canonicalize_include(inner.trim(), line)?;
    let sig_id = cache.find_or_add(canon);
    let mut node = Node::new(Flag::INCLUDE, sig_id, sig_id, line);

    if is_diff {
        let mut edits = read_attribute_tags(sc, line)?;
        edits = finish_diff_edits(edits);
        check_forbidden(Flag::INCLUDE, edits, Flag::include_forbidden(), line)?;
        if edits.contains(Flag::RENAME) {
            sc.skip_ws();
            if !sc.consume_str("!include") {
                return Err(ParseError::syntax(Some(line), "rename payload must be another !include"));
            }
            sc.skip_ws();
            let new_inner = sc
                .read_balanced('(', ')')
                .ok_or_else(|| ParseError::syntax(Some(line), "expected `(...)` after renamed !include"))?
                .to_string();
            let new_canon = signature::canonicalize_include(new_inner.trim(), line)?;
            node.new_sig_id = cache.find_or_add(new_canon);
        }
        node.flags = Flag::INCLUDE | edits;
        if edits == Flag::NOOP {
            return Ok(None);
        }
    }
    sc.skip_ws();
    sc.consume_char(';');
    Ok(Some(node))
}

fn parse_vardecl(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Option<Node>> {
    let line = sc.line;
    sc.skip_ws();
    let ty = sc
        .read_while(all_word_char_byte)
        .to_string();
    if !ty.starts_with("Var") {
        return Err(ParseError::syntax(Some(line), format!("expected a variable declaration, found `{ty}`")));
    }
    sc.skip_ws();
    let inner = sc
        .read_balanced('(', ')')
        .ok_or_else(|| ParseError::syntax(Some(line), "expected `(...)` after variable type"))?
        .to_string();
    let (name_arg, value_arg) = split_first_comma(&inner)
        .ok_or_else(|| ParseError::syntax(Some(line), "variable declaration needs a name and a value"))?;
    let canon = signature::canonicalize_vardecl(&ty, name_arg.trim(), value_arg.trim(), line)?;
    let sig_id = cache.find_or_add(canon);
    let mut node = Node::new(Flag::VARDECL, sig_id, sig_id, line);

    if is_diff {
        let mut edits = read_attribute_tags(sc, line)?;
        edits = finish_diff_edits(edits);
        check_forbidden(Flag::VARDECL, edits, Flag::vardecl_forbidden(), line)?;
        if edits.contains(Flag::RENAME) || edits.contains(Flag::REDEFINE) {
            sc.skip_ws();
            let new_ty = sc.read_while(all_word_char_byte).to_string();
            sc.skip_ws();
            let new_inner = sc
                .read_balanced('(', ')')
                .ok_or_else(|| ParseError::syntax(Some(line), "expected `(...)` after replacement variable declaration"))?
                .to_string();
            let (new_name, new_value) = split_first_comma(&new_inner)
                .ok_or_else(|| ParseError::syntax(Some(line), "replacement variable declaration needs a name and a value"))?;
            let new_canon = signature::canonicalize_vardecl(&new_ty, new_name.trim(), new_value.trim(), line)?;
            node.new_sig_id = cache.find_or_add(new_canon);
        }
        node.flags = Flag::VARDECL | edits;
        if edits == Flag::NOOP {
            return Ok(None);
        }
    }
    sc.skip_ws();
    sc.consume_char(';');
    Ok(Some(node))
}

fn all_word_char_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric()
}

fn split_first_comma(s: &str) -> Option<(&str, &str)> {
    let mut depth = 0i32;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            ',' if depth == 0 => return Some((&s[..i], &s[i + 1..])),
            _ => {}
        }
    }
    None
}

// ---------------------------------------------------------------------------------------
// dialect entry points
// ---------------------------------------------------------------------------------------

fn build_def(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Vec<Node>> {
    let mut nodes = Vec::new();
    loop {
        sc.skip_ws();
        if sc.eof() {
            break;
        }
        if let Some(n) = parse_export(sc, is_diff, cache)? {
            nodes.push(n);
        }
    }
    Ok(nodes)
}

fn build_imports_exports(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Vec<Node>> {
    let mut nodes = Vec::new();
    loop {
        sc.skip_ws();
        if sc.starts_with("import") {
            if let Some(n) = parse_import(sc, is_diff, cache)? {
                nodes.push(n);
            }
        } else {
            break;
        }
    }
    loop {
        sc.skip_ws();
        if sc.starts_with("export") {
            if let Some(n) = parse_export(sc, is_diff, cache)? {
                nodes.push(n);
            }
        } else {
            break;
        }
    }
    Ok(nodes)
}

fn build_scr(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Vec<Node>> {
    let mut nodes = build_imports_exports(sc, is_diff, cache)?;
    sc.skip_ws();
    if sc.eof() {
        return Err(ParseError::semantic(None, "scr file has no root sub scope"));
    }
    nodes.push(parse_sub_scope(sc, is_diff, cache)?);
    sc.skip_ws();
    if !sc.eof() {
        return Err(ParseError::syntax(Some(sc.line), "unexpected trailing content after root sub scope"));
    }
    Ok(nodes)
}

fn build_loot(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Vec<Node>> {
    let mut nodes = build_imports_exports(sc, is_diff, cache)?;
    loop {
        sc.skip_ws();
        if sc.eof() {
            break;
        }
        nodes.push(parse_sub_declaration(sc, is_diff, cache)?);
    }
    if !nodes.iter().any(|n| n.is_kind(Flag::SUB_DECLARATION)) {
        return Err(ParseError::semantic(None, "loot file declares no sub"));
    }
    Ok(nodes)
}

fn build_varlist(sc: &mut Scanner, is_diff: bool, cache: &mut StringCache) -> ParseResult<Vec<Node>> {
    let mut nodes = Vec::new();
    loop {
        sc.skip_ws();
        if sc.eof() {
            break;
        }
        if sc.starts_with("!include") {
            if let Some(n) = parse_include(sc, is_diff, cache)? {
                nodes.push(n);
            }
        } else if sc.starts_with("Var") {
            if let Some(n) = parse_vardecl(sc, is_diff, cache)? {
                nodes.push(n);
            }
        } else {
            return Err(ParseError::syntax(Some(sc.line), "expected `!include` or a `Var*` declaration"));
        }
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduce_file_type_by_extension() {
        assert_eq!(deduce_file_type("a/b/c.scr").unwrap(), FileType::Scr);
        assert_eq!(deduce_file_type("a/b/c.def").unwrap(), FileType::Def);
        assert_eq!(deduce_file_type("a/b/c.loot").unwrap(), FileType::Loot);
        assert_eq!(deduce_file_type("a/b/Varlist.scr").unwrap(), FileType::Varlist);
    }

    #[test]
    fn build_def_reads_exports() {
        let mut cache = StringCache::new();
        let nodes = build_tree(FileType::Def, "export int N = 5;", false, 1, &mut cache).unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_kind(Flag::EXPORT));
        assert_eq!(cache.resolve(nodes[0].sig_id), "export int N = 5");
    }

    #[test]
    fn build_scr_reads_root_sub_with_calls() {
        let mut cache = StringCache::new();
        let nodes = build_tree(FileType::Scr, "sub Main() { f(1); g(2); }", false, 1, &mut cache).unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_kind(Flag::SUB_SCOPE));
        assert_eq!(nodes[0].children.len(), 2);
    }

    #[test]
    fn build_scr_diff_insert_is_tagged() {
        let mut cache = StringCache::new();
        let nodes = build_tree(FileType::Scr, "sub Main() { g(2)[insert]; }", true, 1, &mut cache).unwrap();
        let func = &nodes[0].children[0];
        assert!(func.has_edit(Flag::INSERT));
    }

    #[test]
    fn build_scr_root_sub_rejects_insert_attribute() {
        let mut cache = StringCache::new();
        let err = build_tree(FileType::Scr, "sub Main()[insert] { f(1); }", true, 1, &mut cache);
        assert!(err.is_err());
    }

    #[test]
    fn build_varlist_reads_includes_and_vars() {
        let mut cache = StringCache::new();
        let nodes = build_tree(
            FileType::Varlist,
            "!include(\"a.scr\") VarInt(\"n\", 1) VarVec2(\"v\", [1.0,2.0])",
            false,
            1,
            &mut cache,
        )
        .unwrap();
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn noop_only_diff_node_is_elided() {
        let mut cache = StringCache::new();
        let nodes = build_tree(FileType::Def, "export int N[noop] = 5;", true, 1, &mut cache).unwrap();
        assert!(nodes.is_empty());
    }
}
