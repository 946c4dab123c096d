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

//! Top-level parser state (§3) driving one diff/target pair through build → merge → order →
//! serialise. [`Parser`] itself assumes exclusive access; [`SharedParser`] is the
//! mutex-guarded wrapper that matches §5's "one parse runs to completion before another
//! starts" contract when the same parser instance is shared across callers.

use std::sync::Mutex;

use dlpatch_cache::StringCache;

use crate::builder::{self, FileType};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{remove_comments, tab_to_space};
use crate::merger;
use crate::node::Node;
use crate::serializer;

/// Holds one diff/target pair through a single parse (§3's "parser state").
#[derive(Default)]
pub struct Parser {
    cache: StringCache,
    diff: Vec<Node>,
    target: Vec<Node>,
    target_path: String,
    file_type: Option<FileType>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the diff currently held. Clears all other parser state first (§3: "setting a new
    /// diff clears all parser state").
    pub fn set_diff(&mut self, raw: &str) -> ParseResult<()> {
        self.reset();
        let stripped = tab_to_space(&remove_comments(raw));
        let mut lines = stripped.splitn(2, '\n');
        let target_path = lines.next().unwrap_or("").trim().to_string();
        let rest = lines.next().unwrap_or("");
        if target_path.is_empty() {
            return Err(ParseError::syntax(Some(1), "diff is missing its target-path first line"));
        }

        let file_type = builder::deduce_file_type(&target_path)?;
        let diff = builder::build_tree(file_type, rest, true, 2, &mut self.cache).map_err(|e| {
            self.cache.reset();
            e
        })?;

        self.target_path = target_path;
        self.file_type = Some(file_type);
        self.diff = diff;
        Ok(())
    }

    /// Sets the target currently held. Does not disturb the diff or string cache (§3:
    /// "setting a new target clears only `target`").
    pub fn set_target(&mut self, raw: &str) -> ParseResult<()> {
        let file_type = self
            .file_type
            .ok_or_else(|| ParseError::semantic(None, "set_diff must be called before set_target"))?;
        self.target.clear();
        let stripped = tab_to_space(&remove_comments(raw));
        self.target = builder::build_tree(file_type, &stripped, false, 1, &mut self.cache)?;
        Ok(())
    }

    /// The diff's declared target path (§6), i.e. which archive entry the patched text gets
    /// written back into.
    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    /// Clears everything: cache, diff, target, target path, and dialect.
    pub fn reset(&mut self) {
        self.cache.reset();
        self.diff.clear();
        self.target.clear();
        self.target_path.clear();
        self.file_type = None;
    }

    /// Runs the merger (§4.5) and orderer (§4.6) for the dialect deduced from the diff, then
    /// serialises (§4.7) the result to patched source text.
    pub fn parse(&mut self) -> ParseResult<String> {
        let file_type = self
            .file_type
            .ok_or_else(|| ParseError::semantic(None, "no diff has been set"))?;
        let merged = match file_type {
            FileType::Scr => merger::merge_scr(&self.diff, &self.target, &mut self.cache)?,
            FileType::Def => merger::merge_def(&self.diff, &self.target, &mut self.cache)?,
            FileType::Loot => merger::merge_loot(&self.diff, &self.target, &mut self.cache)?,
            FileType::Varlist => merger::merge_varlist(&self.diff, &self.target, &mut self.cache)?,
        };
        Ok(serializer::serialize_tree(&merged, &self.cache))
    }

    /// A debug dump of the held diff tree with edit-flag tags, suitable for `log::debug!`.
    pub fn dump_diff(&self) -> String {
        serializer::serialize_tree_attr(&self.diff, &self.cache)
    }

    /// A debug dump of the held target tree with edit-flag tags, suitable for `log::debug!`.
    pub fn dump_target(&self) -> String {
        serializer::serialize_tree_attr(&self.target, &self.cache)
    }
}

/// Mutex-guarded wrapper matching §5's concurrency contract: `SetDiff`/`SetTarget`/`Parse`/
/// `Reset` all take the same lock, so one parse runs to completion before another caller's
/// begins.
#[derive(Default)]
pub struct SharedParser(Mutex<Parser>);

impl SharedParser {
    pub fn new() -> Self {
        SharedParser(Mutex::new(Parser::new()))
    }

    pub fn set_diff(&self, raw: &str) -> ParseResult<()> {
        self.0.lock().expect("parser mutex poisoned").set_diff(raw)
    }

    pub fn set_target(&self, raw: &str) -> ParseResult<()> {
        self.0.lock().expect("parser mutex poisoned").set_target(raw)
    }

    pub fn target_path(&self) -> String {
        self.0.lock().expect("parser mutex poisoned").target_path().to_string()
    }

    pub fn parse(&self) -> ParseResult<String> {
        self.0.lock().expect("parser mutex poisoned").parse()
    }

    pub fn reset(&self) {
        self.0.lock().expect("parser mutex poisoned").reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_only_diff_reproduces_target_unchanged() {
        let mut p = Parser::new();
        p.set_diff("scripts/a.def\nexport int N[noop] = 5;").unwrap();
        p.set_target("export int N = 5;").unwrap();
        assert_eq!(p.parse().unwrap(), "export int N = 5;");
    }

    #[test]
    fn insert_scenario_from_spec() {
        let mut p = Parser::new();
        p.set_diff("scripts/a.scr\nsub Main() { g(2)[insert]; }").unwrap();
        p.set_target("sub Main() { f(1); }").unwrap();
        assert_eq!(p.parse().unwrap(), "sub Main() {\n\tg(2);\n\tf(1);\n}");
    }

    #[test]
    fn rename_scenario_from_spec() {
        let mut p = Parser::new();
        p.set_diff("scripts/a.scr\nsub Main() { f(1)[rename] f(2); }").unwrap();
        p.set_target("sub Main() { f(1); }").unwrap();
        assert_eq!(p.parse().unwrap(), "sub Main() {\n\tf(2);\n}");
    }

    #[test]
    fn delete_scenario_from_spec() {
        let mut p = Parser::new();
        p.set_diff("scripts/a.scr\nsub Main() { f(1)[delete]; }").unwrap();
        p.set_target("sub Main() { f(1); g(3); }").unwrap();
        assert_eq!(p.parse().unwrap(), "sub Main() {\n\tg(3);\n}");
    }

    #[test]
    fn export_redefine_scenario_from_spec() {
        let mut p = Parser::new();
        p.set_diff("scripts/a.def\nexport int N[redefine] 7;").unwrap();
        p.set_target("export int N = 5;").unwrap();
        assert_eq!(p.parse().unwrap(), "export int N = 7;");
    }

    #[test]
    fn import_ordering_scenario_from_spec() {
        let mut p = Parser::new();
        p.set_diff("scripts/a.scr\nimport \"c\"[insert]\nsub Main() { f(1); }").unwrap();
        p.set_target("import \"a\"\nimport \"b\"\nsub Main() { f(1); }").unwrap();
        assert_eq!(
            p.parse().unwrap(),
            "import \"c\"\nimport \"a\"\nimport \"b\"\nsub Main() {\n\tf(1);\n}"
        );
    }

    #[test]
    fn delete_miss_warns_and_leaves_target_unchanged() {
        let mut p = Parser::new();
        p.set_diff("scripts/a.scr\nsub Main() { h(9)[delete]; }").unwrap();
        p.set_target("sub Main() { f(1); }").unwrap();
        assert_eq!(p.parse().unwrap(), "sub Main() {\n\tf(1);\n}");
    }

    #[test]
    fn varlist_length_mismatch_is_a_hard_error() {
        let mut p = Parser::new();
        let diff_err = p.set_diff("scripts/varlist.scr\nVarVec3(\"v\", [1.0, 2.0])");
        assert!(diff_err.is_err());
    }

    #[test]
    fn set_diff_resets_prior_state() {
        let mut p = Parser::new();
        p.set_diff("scripts/a.def\nexport int N = 1;").unwrap();
        p.set_target("export int N = 1;").unwrap();
        p.set_diff("scripts/b.def\nexport int M = 2;").unwrap();
        assert_eq!(p.target_path(), "scripts/b.def");
        // target was cleared along with everything else by the second set_diff.
        assert!(p.parse().is_err());
    }
}
