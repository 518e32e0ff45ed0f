//! Sandboxed resolution of `include` documents.
//!
//! Include targets are confined to a base directory fixed for the whole
//! top-level build: the requested filename is normalised component by
//! component (never by string-prefix comparison) and then read through a
//! `cap-std` capability handle opened on the base directory, so traversal
//! and symlink escapes are stopped at both the lexical and the filesystem
//! layer. Recursion is bounded independently of the host call stack.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tracing::debug;

use crate::document::DocumentStream;
use crate::error::{CollectionError, CollectionResult};

/// Maximum depth of nested include expansions unless overridden on the
/// builder.
pub const DEFAULT_RECURSION_LIMIT: usize = 10;

/// Resolve one include request into a document stream.
///
/// Validation happens in a fixed order, each step a distinct failure:
/// missing base path, base path not a directory, missing filename, target
/// outside the base, recursion limit exceeded. The limit is checked before
/// the file is opened so a cyclic include graph terminates deterministically.
///
/// # Errors
///
/// Returns the corresponding [`CollectionError`] for each validation failure,
/// [`CollectionError::File`] if the target cannot be read, and any parse
/// error from the target's document stream.
pub(crate) fn resolve(
    filename: Option<&str>,
    base_path: Option<&Utf8Path>,
    depth: usize,
    limit: usize,
) -> CollectionResult<DocumentStream> {
    let base = base_path.ok_or(CollectionError::MissingBasePath)?;
    if !base.is_dir() {
        return Err(CollectionError::InvalidBasePath {
            path: base.to_owned(),
        });
    }
    let filename = filename.ok_or(CollectionError::MissingFilename)?;
    let relative = contain(base, filename)?;
    if depth >= limit {
        return Err(CollectionError::RecursionLimit {
            filename: filename.to_owned(),
            limit,
        });
    }
    debug!(%base, %relative, depth, "resolving include");
    let target = base.join(&relative);
    let dir = Dir::open_ambient_dir(base, ambient_authority())
        .map_err(|err| CollectionError::file(base, err))?;
    let data = dir
        .read_to_string(&relative)
        .map_err(|err| CollectionError::file(&target, err))?;
    DocumentStream::from_yaml(&data, target.as_str())
}

/// Normalise `filename` and prove it stays inside `base`.
///
/// Absolute filenames and any `..` traversal that pops past the base are
/// rejected. Returns the normalised path relative to `base`.
fn contain(base: &Utf8Path, filename: &str) -> CollectionResult<Utf8PathBuf> {
    let outside = || CollectionError::OutsideBasePath {
        filename: filename.to_owned(),
        base: base.to_owned(),
    };
    let candidate = Utf8Path::new(filename);
    if candidate.is_absolute() {
        return Err(outside());
    }
    let mut normalised = Utf8PathBuf::new();
    let mut inside = 0usize;
    for component in candidate.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::Normal(part) => {
                normalised.push(part);
                inside += 1;
            }
            Utf8Component::ParentDir => {
                if inside == 0 {
                    return Err(outside());
                }
                normalised.pop();
                inside -= 1;
            }
            Utf8Component::RootDir | Utf8Component::Prefix(_) => return Err(outside()),
        }
    }
    if normalised.as_str().is_empty() {
        return Err(outside());
    }
    Ok(normalised)
}
