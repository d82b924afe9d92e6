//! Project: Pathwrap
//! Module: options
//!
//! Knobs accepted by the reading and writing operations of a
//! [FsPath](crate::filesys::FsPath), along with the shapes of data that flow
//! in and out of them.

use super::Error;
use std::borrow::Cow;
use std::fmt::Display;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;

/// Text encodings understood when converting between file bytes and strings.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Encoding {
    /// Invalid sequences decode to U+FFFD.
    #[default]
    Utf8,
    /// One byte per code point. Encoding keeps only the low byte of each char.
    Latin1,
}

impl Encoding {
    pub fn decode(&self, bytes: Vec<u8>) -> String {
        match self {
            Self::Utf8 => match String::from_utf8(bytes) {
                Ok(s) => s,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            },
            Self::Latin1 => bytes.into_iter().map(char::from).collect(),
        }
    }

    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        match self {
            Self::Utf8 => Cow::Borrowed(text.as_bytes()),
            Self::Latin1 => Cow::Owned(text.chars().map(|c| (c as u32 & 0xff) as u8).collect()),
        }
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "latin1" | "binary" => Ok(Self::Latin1),
            _ => Err(Error::EncodingUnknown(s.to_string())),
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utf8 => write!(f, "utf8"),
            Self::Latin1 => write!(f, "latin1"),
        }
    }
}

/// The mode a file is opened in, written in the familiar `r`/`w`/`a` letters.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flag {
    /// `r`
    Read,
    /// `r+` (also accepts `rs+`)
    ReadWrite,
    /// `w`
    Write,
    /// `wx`
    WriteExclusive,
    /// `w+`
    WriteRead,
    /// `wx+`
    WriteReadExclusive,
    /// `a`
    Append,
    /// `ax`
    AppendExclusive,
    /// `a+`
    AppendRead,
    /// `ax+`
    AppendReadExclusive,
}

impl Flag {
    /// Translates the flag into the equivalent set of open options.
    pub fn to_open_options(&self) -> OpenOptions {
        let mut opts = OpenOptions::new();
        match self {
            Self::Read => opts.read(true),
            Self::ReadWrite => opts.read(true).write(true),
            Self::Write => opts.write(true).create(true).truncate(true),
            Self::WriteExclusive => opts.write(true).create_new(true),
            Self::WriteRead => opts.read(true).write(true).create(true).truncate(true),
            Self::WriteReadExclusive => opts.read(true).write(true).create_new(true),
            Self::Append => opts.append(true).create(true),
            Self::AppendExclusive => opts.append(true).create_new(true),
            Self::AppendRead => opts.read(true).append(true).create(true),
            Self::AppendReadExclusive => opts.read(true).append(true).create_new(true),
        };
        opts
    }
}

impl FromStr for Flag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "r" => Self::Read,
            "r+" | "rs+" => Self::ReadWrite,
            "w" => Self::Write,
            "wx" | "xw" => Self::WriteExclusive,
            "w+" => Self::WriteRead,
            "wx+" | "xw+" => Self::WriteReadExclusive,
            "a" => Self::Append,
            "ax" | "xa" => Self::AppendExclusive,
            "a+" => Self::AppendRead,
            "ax+" | "xa+" => Self::AppendReadExclusive,
            _ => return Err(Error::FlagUnknown(s.to_string())),
        })
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct ReadOptions {
    /// Turn directory entry names into absolute paths. Only consulted for
    /// directories; never handed to the directory read itself.
    pub absolute_path: bool,
    /// Decode file contents to text. Raw bytes are returned when unset.
    pub encoding: Option<Encoding>,
    /// Defaults to [Flag::Read].
    pub flag: Option<Flag>,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absolute_path(mut self, absolute_path: bool) -> Self {
        self.absolute_path = absolute_path;
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn flag(mut self, flag: Flag) -> Self {
        self.flag = Some(flag);
        self
    }
}

impl From<Encoding> for ReadOptions {
    fn from(value: Encoding) -> Self {
        Self::new().encoding(value)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct WriteOptions {
    /// Applied to [Payload::Text] only.
    pub encoding: Encoding,
    pub flag: Flag,
    /// Permission bits for a newly created file (before umask). Unix only.
    pub mode: u32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::Utf8,
            flag: Flag::Write,
            mode: 0o666,
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn flag(mut self, flag: Flag) -> Self {
        self.flag = flag;
        self
    }

    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub(crate) fn to_open_options(&self) -> OpenOptions {
        #[allow(unused_mut)]
        let mut opts = self.flag.to_open_options();
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(self.mode);
        }
        opts
    }
}

impl From<Encoding> for WriteOptions {
    fn from(value: Encoding) -> Self {
        Self::new().encoding(value)
    }
}

/// Data handed to a write.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Payload<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> Payload<'a> {
    pub fn encode(&self, encoding: Encoding) -> Cow<'a, [u8]> {
        match self {
            Self::Text(s) => encoding.encode(s),
            Self::Bytes(b) => Cow::Borrowed(b),
        }
    }
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for Payload<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl<'a> From<&'a [u8]> for Payload<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Bytes(value)
    }
}

impl<'a> From<&'a Vec<u8>> for Payload<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        Self::Bytes(value.as_slice())
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Payload<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Self::Bytes(value.as_slice())
    }
}

/// What a read produced.
#[derive(Debug, PartialEq, Clone)]
pub enum Contents {
    /// Immediate entries of a directory, as names or absolute paths.
    Entries(Vec<PathBuf>),
    Text(String),
    Bytes(Vec<u8>),
}

impl Contents {
    pub fn as_entries(&self) -> Option<&[PathBuf]> {
        match self {
            Self::Entries(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::Text(s) => Some(s.as_bytes()),
            Self::Entries(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ut_parse_flag_ok() {
        assert_eq!(Flag::from_str("r").unwrap(), Flag::Read);
        assert_eq!(Flag::from_str("rs+").unwrap(), Flag::ReadWrite);
        assert_eq!(Flag::from_str(" wx+ ").unwrap(), Flag::WriteReadExclusive);
        assert_eq!(Flag::from_str("a+").unwrap(), Flag::AppendRead);
    }

    #[test]
    fn ut_parse_flag_err() {
        match Flag::from_str("q") {
            Err(Error::FlagUnknown(s)) => assert_eq!(s, "q"),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn ut_parse_encoding() {
        assert_eq!(Encoding::from_str("UTF-8").unwrap(), Encoding::Utf8);
        assert_eq!(Encoding::from_str("binary").unwrap(), Encoding::Latin1);
        assert!(Encoding::from_str("ebcdic").is_err());
    }

    #[test]
    fn ut_decode_utf8_lossy() {
        let s = Encoding::Utf8.decode(vec![b'h', b'i', 0xff]);
        assert_eq!(s, "hi\u{fffd}");
    }

    #[test]
    fn ut_latin1_both_ways() {
        assert_eq!(Encoding::Latin1.decode(vec![0x63, 0x61, 0x66, 0xe9]), "café");
        assert_eq!(
            Encoding::Latin1.encode("café").as_ref(),
            &[0x63, 0x61, 0x66, 0xe9]
        );
    }

    #[test]
    fn ut_payload_encode() {
        let p = Payload::from("é");
        assert_eq!(p.encode(Encoding::Utf8).as_ref(), "é".as_bytes());
        let p = Payload::from(&[1u8, 2, 3]);
        assert_eq!(p.encode(Encoding::Latin1).as_ref(), &[1, 2, 3]);
    }
}
