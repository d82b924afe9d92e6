use std::io;
use std::path::PathBuf;

type LastError = String;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to walk directory: {0}")]
    Walk(ignore::Error),
    #[error("unknown encoding \"{0}\"")]
    EncodingUnknown(String),
    #[error("unknown open flag \"{0}\"")]
    FlagUnknown(String),
    #[error("unknown operation \"{0}\" (expected one of: info, read, tree, mkdir, copy, move, write)")]
    OperationUnknown(String),
    #[error("operation \"{0}\" requires option --{1}")]
    OperandMissing(String, &'static str),
    #[error("path {0:?} does not exist")]
    PathMissing(PathBuf),
    #[error("path {0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to read config file {0:?}: {1}")]
    ConfigRead(PathBuf, LastError),
    #[error("failed to parse config file {0:?}: {1}")]
    TomlParse(PathBuf, LastError),
}

impl Error {
    // Presents the message `s` without the first letter being capitalized.
    pub fn lowerize(s: String) -> String {
        s.char_indices()
            .map(|(i, c)| if i == 0 { c.to_ascii_lowercase() } else { c })
            .collect()
    }

    /// Returns the operating system error code when this error came from a
    /// filesystem call.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::Io(e) => e.raw_os_error(),
            Self::Walk(e) => e.io_error().and_then(|e| e.raw_os_error()),
            _ => None,
        }
    }
}

impl From<ignore::Error> for Error {
    fn from(value: ignore::Error) -> Self {
        // keep the os error intact when the walker is only wrapping one
        if value.io_error().is_none() {
            return Self::Walk(value);
        }
        let msg = value.to_string();
        match value.into_io_error() {
            Some(e) => Self::Io(unwrap_os_error(e)),
            None => Self::Io(io::Error::new(io::ErrorKind::Other, msg)),
        }
    }
}

/// Digs the operating system error out of an error the walker wrapped around
/// it, leaving `e` untouched when there is none to find.
fn unwrap_os_error(e: io::Error) -> io::Error {
    if e.raw_os_error().is_some() {
        return e;
    }
    let mut next: Option<&(dyn std::error::Error + 'static)> = match e.get_ref() {
        Some(inner) => Some(inner),
        None => None,
    };
    while let Some(current) = next {
        if let Some(code) = current
            .downcast_ref::<io::Error>()
            .and_then(|io| io.raw_os_error())
        {
            return io::Error::from_raw_os_error(code);
        }
        next = current.source();
    }
    e
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ut_lowerize() {
        assert_eq!(
            Error::lowerize(String::from("No such file")),
            "no such file"
        );
        assert_eq!(Error::lowerize(String::new()), "");
    }

    #[derive(Debug)]
    struct Wrapper(io::Error);

    impl std::fmt::Display for Wrapper {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "IO error for operation on x: {}", self.0)
        }
    }

    impl std::error::Error for Wrapper {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn ut_unwrap_os_error_from_wrapped() {
        let wrapped = io::Error::new(
            io::ErrorKind::NotFound,
            Wrapper(io::Error::from_raw_os_error(2)),
        );
        assert_eq!(wrapped.raw_os_error(), None);
        let e = unwrap_os_error(wrapped);
        assert_eq!(e.raw_os_error(), Some(2));
        assert_eq!(e.to_string(), io::Error::from_raw_os_error(2).to_string());

        let plain = io::Error::new(io::ErrorKind::Other, "no os code here");
        assert_eq!(unwrap_os_error(plain).to_string(), "no os code here");
    }

    #[test]
    fn ut_io_error_is_transparent() {
        let e = Error::from(io::Error::from_raw_os_error(2));
        assert_eq!(e.raw_os_error(), Some(2));
        assert_eq!(
            e.to_string(),
            io::Error::from_raw_os_error(2).to_string()
        );
    }
}
