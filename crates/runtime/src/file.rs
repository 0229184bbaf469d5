//! File words for Pith
//!
//! All access goes through the runtime's file-system collaborator, and
//! relative paths resolve against the project root when one is set.
//!
//! # Usage from Pith
//!
//! ```pith
//! "notes.txt" file-read             # ( path -- str|nil )
//! "hello" "notes.txt" file-write    # ( contents path -- )
//! "more" "notes.txt" file-append    # ( contents path -- )
//! "notes.txt" file-exists           # ( path -- bool )
//! "." dir-list                      # ( path -- arr|nil )
//! ```

use crate::builtins::{pop_args, push_bool};
use crate::runtime::Runtime;
use pith_core::Value;
use std::path::PathBuf;
use tracing::debug;

fn pop_path(rt: &mut Runtime, word: &str) -> Result<PathBuf, String> {
    match rt.pop()? {
        Value::String(path) => Ok(rt.resolve_path(&path)),
        _ => Err(format!("{} requires a string path", word)),
    }
}

/// Pop ( contents path ) for the writing words
fn pop_contents_and_path(rt: &mut Runtime, word: &str) -> Result<(String, PathBuf), String> {
    match pop_args::<2>(rt)? {
        [Value::String(contents), Value::String(path)] => {
            Ok((contents.to_string(), rt.resolve_path(&path)))
        }
        [_, Value::String(_)] => Err(format!("{} requires string contents", word)),
        _ => Err(format!("{} requires a string path", word)),
    }
}

/// Nil when the file cannot be read
pub fn read(rt: &mut Runtime) -> Result<(), String> {
    let path = pop_path(rt, "file-read")?;
    match rt.fs().read_file(&path) {
        Some(text) => rt.push(Value::from(text)),
        None => {
            debug!("file-read: could not read {}", path.display());
            rt.push(Value::Nil)
        }
    }
}

pub fn write(rt: &mut Runtime) -> Result<(), String> {
    let (contents, path) = pop_contents_and_path(rt, "file-write")?;
    if rt.fs().write_file(&path, &contents) {
        Ok(())
    } else {
        Err("file-write: could not open file for writing".to_string())
    }
}

pub fn append(rt: &mut Runtime) -> Result<(), String> {
    let (contents, path) = pop_contents_and_path(rt, "file-append")?;
    if rt.fs().append_file(&path, &contents) {
        Ok(())
    } else {
        Err("file-append: could not open file for appending".to_string())
    }
}

pub fn exists(rt: &mut Runtime) -> Result<(), String> {
    let path = pop_path(rt, "file-exists")?;
    let found = rt.fs().file_exists(&path);
    push_bool(rt, found)
}

/// Sorted entry names, nil when the directory cannot be listed
pub fn dir_list(rt: &mut Runtime) -> Result<(), String> {
    let path = pop_path(rt, "dir-list")?;
    match rt.fs().list_dir(&path) {
        Some(names) => rt.push(Value::array(names.into_iter().map(Value::from).collect())),
        None => rt.push(Value::Nil),
    }
}
