//! Project: Pathwrap
//! Module: filesys
//!
//! An abstraction layer between the application logic and low-level filesystem
//! functions.
//!
//! A [FsPath] pairs a path with a snapshot of what was found there when it was
//! created. The snapshot is never refreshed; operations that change the
//! filesystem leave it as-is, so build a new [FsPath] to observe their effect.
//! Every operation blocks the calling thread until the filesystem answers.

use crate::config::DisplayStyle;
use crate::options::{Contents, Flag, Payload, ReadOptions, WriteOptions};
use crate::Result;
use colored::Colorize;
use ignore::WalkBuilder;
use std::any::Any;
use std::convert::Infallible;
use std::ffi::OsString;
use std::fmt::Display;
use std::fs;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

const ELLIPSIS: &str = "...";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Kind {
    Missing,
    Directory,
    File,
    /// Exists but is neither a directory nor a regular file (socket, device).
    Other,
}

impl Kind {
    fn probe(p: &Path) -> Self {
        match fs::metadata(p) {
            Ok(m) if m.is_dir() => Self::Directory,
            Ok(m) if m.is_file() => Self::File,
            Ok(_) => Self::Other,
            Err(_) => Self::Missing,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct FsPath {
    raw: String,
    path: PathBuf,
    kind: Kind,
}

/// Anything a [FsPath] can be produced from: a plain path or an existing
/// wrapper.
#[derive(Debug, PartialEq, Clone)]
pub enum PathLike {
    Raw(PathBuf),
    Wrapped(FsPath),
}

impl PathLike {
    pub fn as_path(&self) -> &Path {
        match self {
            Self::Raw(p) => p.as_path(),
            Self::Wrapped(w) => w.path(),
        }
    }
}

impl From<&str> for PathLike {
    fn from(value: &str) -> Self {
        Self::Raw(PathBuf::from(value))
    }
}

impl From<String> for PathLike {
    fn from(value: String) -> Self {
        Self::Raw(PathBuf::from(value))
    }
}

impl From<&String> for PathLike {
    fn from(value: &String) -> Self {
        Self::Raw(PathBuf::from(value))
    }
}

impl From<&Path> for PathLike {
    fn from(value: &Path) -> Self {
        Self::Raw(value.to_path_buf())
    }
}

impl From<PathBuf> for PathLike {
    fn from(value: PathBuf) -> Self {
        Self::Raw(value)
    }
}

impl From<&PathBuf> for PathLike {
    fn from(value: &PathBuf) -> Self {
        Self::Raw(value.clone())
    }
}

impl From<FsPath> for PathLike {
    fn from(value: FsPath) -> Self {
        Self::Wrapped(value)
    }
}

impl From<&FsPath> for PathLike {
    fn from(value: &FsPath) -> Self {
        Self::Wrapped(value.clone())
    }
}

/// Checks if `value` is something [FsPath::make] accepts.
pub fn is_path_like(value: &dyn Any) -> bool {
    value.is::<String>()
        || value.is::<&'static str>()
        || value.is::<PathBuf>()
        || value.is::<FsPath>()
        || value.is::<PathLike>()
}

/// Lexically resolves `.` and `..` components. A `..` at the root stays at the
/// root.
pub fn normalize(p: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    let mut depth: usize = 0;
    for component in p.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => result.push(component.as_os_str()),
            Component::CurDir => (),
            Component::ParentDir => {
                if depth > 0 {
                    result.pop();
                    depth -= 1;
                } else if result.has_root() == false {
                    result.push("..");
                }
            }
            Component::Normal(c) => {
                result.push(c);
                depth += 1;
            }
        }
    }
    result
}

/// Checks if `a` and `b` name the same existing entry.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copies the file at `src` to `dest`. A file copied onto itself is left as-is.
fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    if is_same_file(src, dest) == true {
        tracing::debug!("{:?} is already at {:?}", src, dest);
        return Ok(());
    }
    fs::copy(src, dest)?;
    Ok(())
}

impl FsPath {
    fn query(raw: String, path: PathBuf) -> Self {
        Self {
            kind: Kind::probe(&path),
            raw: raw,
            path: path,
        }
    }

    /// Produces a wrapper from `p`. An existing wrapper is handed back as-is,
    /// keeping its original snapshot.
    pub fn make(p: impl Into<PathLike>) -> Self {
        match p.into() {
            PathLike::Raw(p) => Self::from(p),
            PathLike::Wrapped(w) => w,
        }
    }

    /// The path as it was given.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn exists(&self) -> bool {
        self.kind != Kind::Missing
    }

    pub fn is_directory(&self) -> bool {
        self.kind == Kind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == Kind::File
    }

    /// The extension including its leading dot, or an empty string.
    pub fn extension(&self) -> String {
        match self.path.extension() {
            Some(ext) => format!(".{}", ext.to_string_lossy()),
            None => String::new(),
        }
    }

    pub fn extension_without_dot(&self) -> String {
        let mut ext = self.extension();
        if ext.is_empty() == false {
            ext.remove(0);
        }
        ext
    }

    /// Resolves the path against the current working directory.
    pub fn absolute_path(&self) -> PathBuf {
        match std::env::current_dir() {
            Ok(cwd) => normalize(&cwd.join(&self.path)),
            Err(e) => {
                tracing::warn!("failed to read current directory: {}", e);
                normalize(&self.path)
            }
        }
    }

    /// The absolute path styled for a terminal, with the default style.
    pub fn display_path(&self) -> String {
        self.display_path_with(&DisplayStyle::default())
    }

    /// The absolute path styled for a terminal. When the directory portion is
    /// longer than `style.max_dir_len` characters, the path is cut at that
    /// length and the basename is appended after an ellipsis.
    pub fn display_path_with(&self, style: &DisplayStyle) -> String {
        let abs = self.absolute_path().to_string_lossy().into_owned();
        let base = self.basename();
        let dir_len = abs.chars().count() - base.chars().count();
        let text = match dir_len <= style.max_dir_len {
            true => abs,
            false => {
                let head: String = abs.chars().take(style.max_dir_len).collect();
                format!("{}{}{}", head, ELLIPSIS, base)
            }
        };
        match style.color {
            true => text.dimmed().bold().to_string(),
            false => text,
        }
    }

    /// The directory this path is, or the directory containing this file.
    /// `None` when the path is neither.
    pub fn parent_directory(&self) -> Option<PathBuf> {
        match self.kind {
            Kind::Directory => Some(self.absolute_path()),
            Kind::File => {
                let abs = self.absolute_path();
                Some(abs.parent().map(|p| p.to_path_buf()).unwrap_or(abs))
            }
            _ => None,
        }
    }

    pub fn basename(&self) -> String {
        match self.absolute_path().file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => String::new(),
        }
    }

    pub fn basename_without_extension(&self) -> String {
        let base = self.basename();
        let ext = self.extension();
        match base.strip_suffix(ext.as_str()) {
            Some(stem) if ext.is_empty() == false && stem.is_empty() == false => stem.to_string(),
            _ => base,
        }
    }

    /// Reads with default options.
    pub fn read(&self) -> Result<Option<Contents>> {
        self.read_with(ReadOptions::default())
    }

    /// Lists a directory's immediate entries or reads a file's contents.
    /// Returns `None` when the path is neither.
    pub fn read_with(&self, options: ReadOptions) -> Result<Option<Contents>> {
        match self.kind {
            Kind::Directory => {
                let mut names = fs::read_dir(&self.path)?
                    .map(|e| e.map(|e| e.file_name()))
                    .collect::<std::io::Result<Vec<OsString>>>()?;
                names.sort();
                let entries = match options.absolute_path {
                    true => {
                        let abs = self.absolute_path();
                        names.into_iter().map(|n| abs.join(n)).collect()
                    }
                    false => names.into_iter().map(PathBuf::from).collect(),
                };
                Ok(Some(Contents::Entries(entries)))
            }
            Kind::File => {
                let mut file = options
                    .flag
                    .unwrap_or(Flag::Read)
                    .to_open_options()
                    .open(&self.path)?;
                let mut buf = Vec::new();
                file.read_to_end(&mut buf)?;
                Ok(Some(match options.encoding {
                    Some(enc) => Contents::Text(enc.decode(buf)),
                    None => Contents::Bytes(buf),
                }))
            }
            _ => Ok(None),
        }
    }

    /// Writes with default options.
    pub fn write<'a>(&self, data: impl Into<Payload<'a>>) -> Result<&Self> {
        self.write_with(data, WriteOptions::default())
    }

    /// Writes `data` to this path. The parent directory must already exist.
    pub fn write_with<'a>(&self, data: impl Into<Payload<'a>>, options: WriteOptions) -> Result<&Self> {
        let bytes = data.into().encode(options.encoding);
        let dest = self.absolute_path();
        tracing::debug!("writing {} bytes to {:?}", bytes.len(), dest);
        let mut file = options.to_open_options().open(&dest)?;
        file.write_all(&bytes)?;
        Ok(self)
    }

    /// Copies this file or directory tree to `target`, creating whatever
    /// directories the destination needs. Files already at the destination are
    /// overwritten; files only at the destination are left alone.
    pub fn copy(&self, target: impl Into<PathLike>) -> Result<&Self> {
        let target = Self::make(target);
        match self.kind {
            Kind::File => {
                let dest = target.mkdir(false)?.absolute_path();
                tracing::debug!("copying file {:?} to {:?}", self.path, dest);
                copy_file(&self.path, &dest)?;
            }
            Kind::Directory => {
                target.mkdir(true)?;
                let root = self.absolute_path();
                let dest_root = target.absolute_path();
                tracing::debug!("copying directory {:?} to {:?}", root, dest_root);
                for file in self.deep_list()?.unwrap_or_default() {
                    let relative = match file.strip_prefix(&root) {
                        Ok(r) => r,
                        Err(_) => {
                            tracing::warn!("skipping {:?}: not under {:?}", file, root);
                            continue;
                        }
                    };
                    let dest = Self::make(dest_root.join(relative));
                    tracing::trace!("copying {:?}", relative);
                    copy_file(&file, &dest.mkdir(false)?.absolute_path())?;
                }
            }
            _ => (),
        }
        Ok(self)
    }

    /// Copies to `target` and then removes this path. The returned wrapper
    /// looks at `target` afresh.
    pub fn move_to(&self, target: impl Into<PathLike>) -> Result<FsPath> {
        let target = target.into();
        let dest = target.as_path().to_path_buf();
        if is_same_file(&self.path, &dest) == true {
            return Ok(Self::from(dest));
        }
        self.copy(target)?;
        match self.kind {
            Kind::File => {
                tracing::debug!("removing file {:?}", self.path);
                fs::remove_file(self.absolute_path())?
            }
            Kind::Directory => {
                tracing::debug!("removing directory {:?}", self.path);
                fs::remove_dir_all(self.absolute_path())?
            }
            _ => (),
        }
        Ok(Self::from(dest))
    }

    /// Creates the directory `itself` names when true, otherwise only the
    /// parent of this path. Nothing happens if this path already existed.
    pub fn mkdir(&self, itself: bool) -> Result<&Self> {
        if self.exists() == true {
            return Ok(self);
        }
        let dir = match itself {
            true => Some(self.path.as_path()),
            false => self.path.parent(),
        };
        if let Some(dir) = dir {
            tracing::debug!("creating directory {:?}", dir);
            fs::create_dir_all(dir)?;
        }
        Ok(self)
    }

    /// Absolute paths of every non-directory entry beneath this directory, in
    /// depth-first order with siblings sorted by name. `None` when this is not
    /// a directory.
    pub fn deep_list(&self) -> Result<Option<Vec<PathBuf>>> {
        if self.is_directory() == false {
            return Ok(None);
        }
        let root = self.absolute_path();
        tracing::debug!("walking {:?}", root);
        let walker = WalkBuilder::new(&root)
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();
        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if entry.depth() == 0 {
                continue;
            }
            match entry.file_type() {
                Some(ft) if ft.is_dir() => (),
                _ => files.push(entry.into_path()),
            }
        }
        Ok(Some(files))
    }

    /// A new wrapper for this path's absolute location joined with `segments`.
    /// Every segment is taken as relative to what precedes it.
    pub fn join<I, S>(&self, segments: I) -> FsPath
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        let mut joined = self.absolute_path();
        segments.into_iter().for_each(|s| {
            s.as_ref()
                .components()
                .filter(|c| matches!(c, Component::Prefix(_) | Component::RootDir) == false)
                .for_each(|c| joined.push(c.as_os_str()));
        });
        Self::from(normalize(&joined))
    }
}

impl Default for FsPath {
    fn default() -> Self {
        Self::from(String::new())
    }
}

impl FromStr for FsPath {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<String> for FsPath {
    fn from(value: String) -> Self {
        let path = PathBuf::from(&value);
        Self::query(value, path)
    }
}

impl From<&str> for FsPath {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<PathBuf> for FsPath {
    fn from(value: PathBuf) -> Self {
        Self::query(value.to_string_lossy().into_owned(), value)
    }
}

impl From<&Path> for FsPath {
    fn from(value: &Path) -> Self {
        Self::from(value.to_path_buf())
    }
}

impl AsRef<Path> for FsPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Display for FsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
