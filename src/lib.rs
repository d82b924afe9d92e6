pub mod config;
pub mod error;
pub mod filesys;
pub mod help;
pub mod options;
pub mod pathwrap;

pub use error::{Error, Result};
pub use filesys::{is_path_like, FsPath, PathLike};
pub use options::{Contents, Encoding, Flag, Payload, ReadOptions, WriteOptions};
pub use pathwrap::Pathwrap;
