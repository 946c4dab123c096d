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

//! Scans a directory of diff files and a directory of `.pak` archives, drives one [`Parser`]
//! over every diff and, unless `--dry-run` was given, commits the results back into the
//! archives that hold their targets.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dlpatch_archive::Workspace;
use dlpatch_parser::SharedParser;
use getopts::Options;

fn usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {program} [options] DIFF_DIR ARCHIVE_DIR");
    print!("{}", opts.usage(&brief));
}

/// One diff file successfully parsed and ready to be written back.
struct Staged {
    diff_path: PathBuf,
    target_path: String,
    patched_text: String,
}

/// Non-recursive directory listing of regular files, rejecting a missing or empty directory
/// the same way the patcher this is modelled on does.
fn scan_regular_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    if !dir.is_dir() {
        return Err(format!("path <{}> does not exist or is not a directory", dir.display()));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| e.to_string())? {
        let entry = entry.map_err(|e| e.to_string())?;
        if entry.path().is_file() {
            files.push(entry.path());
        }
    }
    if files.is_empty() {
        return Err(format!("path <{}> contains no files", dir.display()));
    }
    files.sort();
    Ok(files)
}

/// Reads every diff in `diff_dir`, parses it against its resolved target in `workspace`, and
/// stages the result. Aborts the whole batch on the first hard failure, mirroring the
/// original's all-or-nothing `JustParse` — a failed diff means no diff in this run gets
/// committed.
fn parse_all(diff_dir: &Path, workspace: &mut Workspace, parser: &SharedParser) -> Result<Vec<Staged>, String> {
    let diffs = scan_regular_files(diff_dir)?;
    log::info!("path <{}> contains {} (diff?) files!", diff_dir.display(), diffs.len());

    let mut staged = Vec::with_capacity(diffs.len());
    for diff_path in diffs {
        let diff_text = fs::read_to_string(&diff_path)
            .map_err(|e| format!("failed to open diff <{}>: {e}", diff_path.display()))?;
        parser
            .set_diff(&diff_text)
            .map_err(|e| format!("failed to set diff <{}>: {e}", diff_path.display()))?;

        let target_path = parser.target_path();
        let index = workspace
            .resolve(&target_path)
            .ok_or_else(|| format!("failed to locate target <{target_path}> requested in diff <{}>", diff_path.display()))?;
        let target_text = workspace
            .read(index, &target_path)
            .map_err(|e| format!("failed to read target <{target_path}>: {e}"))?;
        parser
            .set_target(&target_text)
            .map_err(|e| format!("failed to set target <{target_path}>: {e}"))?;

        let patched_text = parser
            .parse()
            .map_err(|e| format!("failed to parse <{}>: {e}", diff_path.display()))?;

        log::info!("{}: parsed ok", diff_path.display());
        staged.push(Staged { diff_path, target_path, patched_text });
    }
    Ok(staged)
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optflag("n", "dry-run", "parse every diff but do not commit the results");
    opts.optflag("v", "verbose", "enable info-level logging even without RUST_LOG set");
    opts.optflag("h", "help", "print this help menu");

    let matches = opts.parse(&args[1..]).map_err(|e| e.to_string())?;
    if matches.opt_present("h") || matches.free.len() != 2 {
        usage(&program, &opts);
        return Ok(());
    }
    if matches.opt_present("v") && env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let diff_dir = PathBuf::from(&matches.free[0]);
    let archive_dir = PathBuf::from(&matches.free[1]);
    let dry_run = matches.opt_present("n");

    let mut workspace = Workspace::open_dir(&archive_dir).map_err(|e| e.to_string())?;
    if workspace.is_empty() {
        return Err(format!("path <{}> contains no .pak files", archive_dir.display()));
    }
    log::info!("path <{}> contains {} .pak files!", archive_dir.display(), workspace.len());

    let parser = SharedParser::new();
    let staged = parse_all(&diff_dir, &mut workspace, &parser)?;

    if dry_run {
        log::info!("successfully parsed all {} files. ready to commit!", staged.len());
        for s in &staged {
            println!("{}: would patch {}", s.diff_path.display(), s.target_path);
        }
        return Ok(());
    }

    for s in &staged {
        workspace
            .commit(&s.target_path, &s.patched_text)
            .map_err(|e| format!("commit failed but some files may have been patched: {e}"))?;
    }
    workspace.close().map_err(|errs| {
        errs.into_iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
    })?;

    log::info!("successfully committed {} parsed files!", staged.len());
    for s in &staged {
        println!("{}: committed to {}", s.diff_path.display(), s.target_path);
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
