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

//! Canonicalisation of the raw text captured for each construct into the single normalised
//! string form that gets interned as a node's signature. Every function here is total: it
//! either produces a canonical string or a [`ParseError::Syntax`]/[`ParseError::Semantic`].

use crate::error::{ParseError, ParseResult};
use crate::lexer::{all_identifier_char, all_number_char, all_word_char};

fn is_valid_int_arg(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    all_number_char(s)
}

fn is_valid_float_arg(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    match s.split_once('.') {
        Some((int_part, frac_part)) => all_number_char(int_part) && all_number_char(frac_part),
        None => false,
    }
}

/// Splits `args` (the text between a construct's outer parens, already brace/paren
/// balanced) on top-level commas, i.e. commas not nested inside `[...]`.
fn split_top_level_commas(args: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut cur = String::new();
    for c in args.chars() {
        match c {
            '[' => {
                depth += 1;
                cur.push(c);
            }
            ']' => {
                depth -= 1;
                cur.push(c);
            }
            ',' if depth == 0 => {
                out.push(cur.trim().to_string());
                cur.clear();
            }
            _ => cur.push(c),
        }
    }
    if !cur.trim().is_empty() || !out.is_empty() {
        out.push(cur.trim().to_string());
    }
    out
}

/// Canonicalises one function-call argument: a quoted string, a math-op chain of
/// identifiers/ints/floats, or a homogeneous array of ints or floats.
fn canonicalize_call_arg(arg: &str, line: u64) -> ParseResult<String> {
    if arg.is_empty() {
        return Err(ParseError::syntax(Some(line), "empty function call argument"));
    }

    if let Some(inner) = arg.strip_prefix('"') {
        let inner = inner
            .strip_suffix('"')
            .ok_or_else(|| ParseError::syntax(Some(line), "unterminated string argument"))?;
        if inner.contains('\n') {
            return Err(ParseError::syntax(Some(line), "string argument cannot span multiple lines"));
        }
        return Ok(format!("\"{inner}\""));
    }

    if let Some(inner) = arg.strip_prefix('[') {
        let inner = inner
            .strip_suffix(']')
            .ok_or_else(|| ParseError::syntax(Some(line), "unterminated array argument"))?;
        let elems = split_top_level_commas(inner);
        if elems.is_empty() || elems.iter().any(|e| e.is_empty()) {
            return Err(ParseError::semantic(Some(line), "array argument cannot contain empty elements"));
        }
        if elems.iter().all(|e| is_valid_float_arg(e)) {
            return Ok(format!("[{}]", elems.join(",")));
        }
        if elems.iter().all(|e| is_valid_int_arg(e)) {
            return Ok(format!("[{}]", elems.join(",")));
        }
        return Err(ParseError::semantic(
            Some(line),
            "array argument elements must be uniformly int or float",
        ));
    }

    // Expression chain: ident|int|float, optionally repeated with +/- between terms.
    let mut terms = Vec::new();
    let mut ops = Vec::new();
    let mut rest = arg;
    loop {
        let (term, consumed) = read_leading_term(rest)
            .ok_or_else(|| ParseError::syntax(Some(line), format!("invalid expression argument `{arg}`")))?;
        terms.push(term.to_string());
        rest = &rest[consumed..];
        if rest.is_empty() {
            break;
        }
        let op = rest.as_bytes()[0];
        if op != b'+' && op != b'-' {
            return Err(ParseError::syntax(Some(line), format!("invalid expression argument `{arg}`")));
        }
        ops.push(op as char);
        rest = &rest[1..];
        if rest.is_empty() {
            return Err(ParseError::syntax(Some(line), format!("dangling operator in argument `{arg}`")));
        }
    }
    let mut out = terms[0].clone();
    for (op, term) in ops.into_iter().zip(terms.into_iter().skip(1)) {
        out.push(op);
        out.push_str(&term);
    }
    Ok(out)
}

fn read_leading_term(s: &str) -> Option<(&str, usize)> {
    if s.is_empty() {
        return None;
    }
    let bytes = s.as_bytes();
    if bytes[0].is_ascii_alphabetic() || bytes[0] == b'_' {
        let mut end = 1;
        while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
            end += 1;
        }
        return Some((&s[..end], end));
    }
    // numeric: optional leading '-', digits, optional '.' digits
    let mut end = if bytes[0] == b'-' { 1 } else { 0 };
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            return Some((&s[..frac_end], frac_end));
        }
    }
    Some((&s[..end], end))
}

/// `Name(args...)` -> canonical `Name(a1,a2,...)`.
pub fn canonicalize_function_call(name: &str, raw_args: &str, line: u64) -> ParseResult<String> {
    if !all_word_char(name) && !(name.bytes().next().map(|c| c.is_ascii_alphabetic() || c == b'_').unwrap_or(false)) {
        return Err(ParseError::syntax(Some(line), format!("invalid function name `{name}`")));
    }
    let raw_args = raw_args.trim();
    if raw_args.is_empty() {
        return Ok(format!("{name}()"));
    }
    let parts = split_top_level_commas(raw_args);
    let mut canon = Vec::with_capacity(parts.len());
    for p in parts {
        if p.is_empty() {
            return Err(ParseError::syntax(Some(line), "empty positional argument"));
        }
        canon.push(canonicalize_call_arg(&p, line)?);
    }
    Ok(format!("{name}({})", canon.join(",")))
}

/// `use Name ( )` -> canonical `use Name()`.
pub fn canonicalize_use(name: &str, paren_inner: &str, line: u64) -> ParseResult<String> {
    if paren_inner.trim() != "" {
        return Err(ParseError::syntax(Some(line), "use statement takes no arguments"));
    }
    if name.is_empty() || !all_identifier_char(name) {
        return Err(ParseError::syntax(Some(line), format!("invalid use target `{name}`")));
    }
    Ok(format!("use {name}()"))
}

/// `!include ( "p" )` -> canonical `!include("p")`.
pub fn canonicalize_include(path: &str, line: u64) -> ParseResult<String> {
    if !path.starts_with('"') || !path.ends_with('"') || path.len() < 2 {
        return Err(ParseError::syntax(Some(line), "include path must be a quoted string"));
    }
    Ok(format!("!include({path})"))
}

/// `import "path"` -> canonical `import "path"`.
pub fn canonicalize_import(path: &str, line: u64) -> ParseResult<String> {
    if !path.starts_with('"') || !path.ends_with('"') || path.len() < 2 {
        return Err(ParseError::syntax(Some(line), "import path must be a quoted string"));
    }
    Ok(format!("import {path}"))
}

/// One `int X = K` / `float Y = F` parameter of a `loot` `sub` declaration.
pub fn canonicalize_sub_decl_param(param: &str, line: u64) -> ParseResult<String> {
    let param = param.trim();
    let (ty, rest) = param
        .split_once(char::is_whitespace)
        .ok_or_else(|| ParseError::syntax(Some(line), format!("malformed sub declaration parameter `{param}`")))?;
    let (name, default) = rest
        .split_once('=')
        .ok_or_else(|| ParseError::syntax(Some(line), format!("sub declaration parameter `{param}` needs a default value")))?;
    let name = name.trim();
    let default = default.trim();
    if !all_identifier_char(name) || name.is_empty() {
        return Err(ParseError::syntax(Some(line), format!("invalid parameter name `{name}`")));
    }
    match ty {
        "int" => {
            if !is_valid_int_arg(default) {
                return Err(ParseError::semantic(Some(line), format!("`int {name}` default `{default}` is not an integer")));
            }
        }
        "float" => {
            if !is_valid_float_arg(default) {
                return Err(ParseError::semantic(Some(line), format!("`float {name}` default `{default}` is not a float")));
            }
        }
        other => return Err(ParseError::syntax(Some(line), format!("unknown parameter type `{other}`"))),
    }
    Ok(format!("{ty} {name} = {default}"))
}

/// `sub Name(params)` (loot) -> canonical `sub Name(int X = K, float Y = F)`.
pub fn canonicalize_sub_declaration(name: &str, raw_params: &str, line: u64) -> ParseResult<String> {
    if name.is_empty() || !all_identifier_char(name) {
        return Err(ParseError::syntax(Some(line), format!("invalid sub name `{name}`")));
    }
    let raw_params = raw_params.trim();
    if raw_params.is_empty() {
        return Ok(format!("sub {name}()"));
    }
    let parts = split_top_level_commas(raw_params);
    let mut canon = Vec::with_capacity(parts.len());
    for p in parts {
        canon.push(canonicalize_sub_decl_param(&p, line)?);
    }
    Ok(format!("sub {name}({})", canon.join(", ")))
}

/// `sub Name()` (scr root scope) -> canonical `sub Name()`.
pub fn canonicalize_sub_scope(name: &str, line: u64) -> ParseResult<String> {
    if name.is_empty() || !all_identifier_char(name) {
        return Err(ParseError::syntax(Some(line), format!("invalid sub name `{name}`")));
    }
    Ok(format!("sub {name}()"))
}

/// `export <type> Name = <value>` -> canonical, same shape, with `<type>` validated and an
/// int's `|`-joined value list preserved.
pub fn canonicalize_export(ty: &str, name: &str, value: &str, line: u64) -> ParseResult<String> {
    if !matches!(ty, "int" | "float" | "string") {
        return Err(ParseError::syntax(Some(line), format!("unknown export type `{ty}`")));
    }
    if name.is_empty() || !all_identifier_char(name) {
        return Err(ParseError::syntax(Some(line), format!("invalid export name `{name}`")));
    }
    let value = value.trim();
    match ty {
        "string" => {
            if !value.starts_with('"') || !value.ends_with('"') || value.len() < 2 {
                return Err(ParseError::semantic(Some(line), format!("export string `{name}` needs a quoted value")));
            }
        }
        "float" => {
            if !is_valid_float_arg(value) && !all_identifier_char(value) {
                return Err(ParseError::semantic(Some(line), format!("export float `{name}` has invalid value `{value}`")));
            }
        }
        "int" => {
            for part in value.split('|') {
                let part = part.trim();
                if !is_valid_int_arg(part) && !all_identifier_char(part) {
                    return Err(ParseError::semantic(Some(line), format!("export int `{name}` has invalid value `{value}`")));
                }
            }
        }
        _ => unreachable!(),
    }
    Ok(format!("export {ty} {name} = {value}"))
}

/// The name-only identity half of an export's canonical signature, used as its compare
/// signature: `export <type> Name`.
pub fn export_compare_signature(ty: &str, name: &str) -> String {
    format!("export {ty} {name}")
}

/// `VarInt`/`VarFloat`/`VarString`/`VarVecN` (`varlist` dialect).
pub fn canonicalize_vardecl(ty: &str, name_arg: &str, value_arg: &str, line: u64) -> ParseResult<String> {
    if !name_arg.starts_with('"') || !name_arg.ends_with('"') || name_arg.len() < 2 {
        return Err(ParseError::syntax(Some(line), "variable declaration name must be a quoted string"));
    }
    if let Some(n_str) = ty.strip_prefix("VarVec") {
        let n: usize = n_str
            .parse()
            .map_err(|_| ParseError::syntax(Some(line), format!("invalid vector variable type `{ty}`")))?;
        if n == 0 {
            return Err(ParseError::semantic(Some(line), "vector variable length must be at least 1"));
        }
        let inner = value_arg
            .strip_prefix('[')
            .and_then(|v| v.strip_suffix(']'))
            .ok_or_else(|| ParseError::syntax(Some(line), format!("`{ty}` value must be an array literal")))?;
        let elems = split_top_level_commas(inner);
        if elems.len() != n {
            return Err(ParseError::semantic(
                Some(line),
                format!("`{ty}` declares length {n} but {} elements were supplied", elems.len()),
            ));
        }
        if !elems.iter().all(|e| is_valid_float_arg(e)) {
            return Err(ParseError::semantic(Some(line), format!("`{ty}` elements must all be floats")));
        }
        return Ok(format!("{ty}({name_arg}, [{}])", elems.join(",")));
    }
    match ty {
        "VarInt" => {
            if !is_valid_int_arg(value_arg) {
                return Err(ParseError::semantic(Some(line), format!("VarInt value `{value_arg}` is not an integer")));
            }
        }
        "VarFloat" => {
            if !is_valid_float_arg(value_arg) && !is_valid_int_arg(value_arg) {
                return Err(ParseError::semantic(Some(line), format!("VarFloat value `{value_arg}` is not numeric")));
            }
        }
        "VarString" => {
            if !value_arg.starts_with('"') || !value_arg.ends_with('"') || value_arg.len() < 2 {
                return Err(ParseError::semantic(Some(line), "VarString value must be a quoted string"));
            }
        }
        other => return Err(ParseError::syntax(Some(line), format!("unknown variable declaration type `{other}`"))),
    }
    Ok(format!("{ty}({name_arg}, {value_arg})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_call_rejects_empty_array_element() {
        assert!(canonicalize_function_call("f", "[1.0,]", 1).is_err());
    }

    #[test]
    fn function_call_accepts_mixed_shapes() {
        assert_eq!(canonicalize_function_call("f", "1", 1).unwrap(), "f(1)");
        assert_eq!(canonicalize_function_call("f", "\"hi\"", 1).unwrap(), "f(\"hi\")");
        assert_eq!(canonicalize_function_call("f", "[1,2,3]", 1).unwrap(), "f([1,2,3])");
        assert_eq!(canonicalize_function_call("f", "a+1", 1).unwrap(), "f(a+1)");
    }

    #[test]
    fn array_rejects_mixed_int_and_float() {
        assert!(canonicalize_function_call("f", "[1,2.0]", 1).is_err());
    }

    #[test]
    fn vardecl_vec_length_must_match() {
        assert!(canonicalize_vardecl("VarVec3", "\"v\"", "[1.0,2.0]", 1).is_err());
        assert!(canonicalize_vardecl("VarVec3", "\"v\"", "[1.0,2.0,3.0]", 1).is_ok());
    }

    #[test]
    fn export_compare_signature_drops_value() {
        assert_eq!(export_compare_signature("int", "N"), "export int N");
    }

    #[test]
    fn idempotent_canonicalisation_round_trips() {
        let once = canonicalize_function_call("f", "1,2,\"s\"", 1).unwrap();
        // re-splitting the canonical form's own argument list should reproduce it exactly.
        let args = once.strip_prefix("f(").unwrap().strip_suffix(')').unwrap();
        let twice = canonicalize_function_call("f", args, 1).unwrap();
        assert_eq!(once, twice);
    }
}
