use super::config::{Config, DisplayStyle};
use super::error::Error;
use super::filesys::FsPath;
use super::help;
use super::options::{Contents, Encoding, ReadOptions};
use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Command, Help};
use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operation {
    Info,
    Read,
    Tree,
    Mkdir,
    Copy,
    Move,
    Write,
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "info" => Self::Info,
            "read" => Self::Read,
            "tree" => Self::Tree,
            "mkdir" => Self::Mkdir,
            "copy" => Self::Copy,
            "move" => Self::Move,
            "write" => Self::Write,
            _ => return Err(Error::OperationUnknown(s.to_string())),
        })
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Read => "read",
            Self::Tree => "tree",
            Self::Mkdir => "mkdir",
            Self::Copy => "copy",
            Self::Move => "move",
            Self::Write => "write",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq)]
pub struct Pathwrap {
    op: Operation,
    path: PathBuf,
    to: Option<PathBuf>,
    data: Option<String>,
    encoding: Option<Encoding>,
    abs: bool,
    parent: bool,
    verbose: bool,
}

impl Command for Pathwrap {
    fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(help::SHORT_HELP))?;
        let verbose = cli.check(Arg::flag("verbose"))?;
        if verbose == true {
            cli.help(Help::with(help::LONG_HELP))?;
        }
        cli.raise_help()?;
        cli.lower_help();
        cli.help(Help::with(help::VERSION).flag("version"))?;
        cli.raise_help()?;
        cli.lower_help();
        cli.help(Help::with(help::SHORT_HELP))?;
        Ok(Self {
            verbose: verbose,
            abs: cli.check(Arg::flag("abs"))?,
            parent: cli.check(Arg::flag("parent"))?,
            to: cli.get(Arg::option("to").value("path"))?,
            data: cli.get(Arg::option("data").value("text"))?,
            encoding: cli.get(Arg::option("encoding").value("name"))?,
            op: cli.require(Arg::positional("op"))?,
            path: cli.require(Arg::positional("path"))?,
        })
    }

    fn execute(self) -> proc::Result {
        init_logging(self.verbose);
        let config = Config::from_home()?;
        let mut stdout = std::io::stdout().lock();
        self.run(config.display(), &mut stdout)?;
        Ok(())
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// verbosity flag.
fn init_logging(verbose: bool) {
    let fallback = match verbose {
        true => "pathwrap=debug",
        false => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

impl Pathwrap {
    fn run(&self, style: &DisplayStyle, out: &mut impl Write) -> Result<(), Error> {
        let target = FsPath::make(&self.path);
        match self.op {
            Operation::Info => self.info(&target, style, out)?,
            Operation::Read => {
                let mut opts = ReadOptions::new().absolute_path(self.abs);
                if let Some(enc) = self.encoding {
                    opts = opts.encoding(enc);
                }
                match target.read_with(opts)? {
                    Some(Contents::Entries(entries)) => {
                        for entry in entries {
                            writeln!(out, "{}", entry.display())?;
                        }
                    }
                    Some(Contents::Text(text)) => write!(out, "{}", text)?,
                    Some(Contents::Bytes(bytes)) => out.write_all(&bytes)?,
                    None => return Err(Error::PathMissing(self.path.clone())),
                }
            }
            Operation::Tree => match target.deep_list()? {
                Some(files) => {
                    for file in files {
                        writeln!(out, "{}", file.display())?;
                    }
                }
                None => return Err(Error::NotADirectory(self.path.clone())),
            },
            Operation::Mkdir => {
                target.mkdir(self.parent == false)?;
            }
            Operation::Copy => {
                let dest = self.require_to()?;
                target.copy(dest)?;
                if self.verbose == true {
                    writeln!(
                        out,
                        "info: copied {} to {}",
                        target.display_path_with(style),
                        FsPath::from(dest.as_path()).display_path_with(style)
                    )?;
                }
            }
            Operation::Move => {
                let dest = self.require_to()?;
                let moved = target.move_to(dest)?;
                if self.verbose == true {
                    writeln!(out, "info: moved to {}", moved.display_path_with(style))?;
                }
            }
            Operation::Write => match &self.data {
                Some(data) => {
                    target.write(data)?;
                }
                None => return Err(Error::OperandMissing(self.op.to_string(), "data")),
            },
        }
        Ok(())
    }

    fn info(&self, target: &FsPath, style: &DisplayStyle, out: &mut impl Write) -> Result<(), Error> {
        let kind = match (target.exists(), target.is_directory(), target.is_file()) {
            (false, _, _) => "missing",
            (true, true, _) => "directory",
            (true, _, true) => "file",
            (true, false, false) => "other",
        };
        writeln!(out, "{}", target.display_path_with(style))?;
        writeln!(out, "kind: {}", kind)?;
        writeln!(out, "extension: {}", target.extension())?;
        match target.parent_directory() {
            Some(dir) => writeln!(out, "parent: {}", dir.display())?,
            None => writeln!(out, "parent: -")?,
        }
        Ok(())
    }

    fn require_to(&self) -> Result<&PathBuf, Error> {
        match &self.to {
            Some(to) => Ok(to),
            None => Err(Error::OperandMissing(self.op.to_string(), "to")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cmd(op: Operation, path: PathBuf) -> Pathwrap {
        Pathwrap {
            op: op,
            path: path,
            to: None,
            data: None,
            encoding: None,
            abs: false,
            parent: false,
            verbose: false,
        }
    }

    fn plain() -> DisplayStyle {
        DisplayStyle {
            color: false,
            ..DisplayStyle::default()
        }
    }

    fn run(pw: &Pathwrap) -> Result<String, Error> {
        let mut out = Vec::new();
        pw.run(&plain(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn ut_parse_operation() {
        assert_eq!(Operation::from_str("move").unwrap(), Operation::Move);
        assert_eq!(Operation::Mkdir.to_string(), "mkdir");
        assert!(matches!(
            Operation::from_str("delete"),
            Err(Error::OperationUnknown(_))
        ));
    }

    #[test]
    fn ut_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.txt");
        let mut pw = cmd(Operation::Write, path.clone());
        pw.data = Some(String::from("hi there"));
        run(&pw).unwrap();
        assert_eq!(run(&cmd(Operation::Read, path)).unwrap(), "hi there");
    }

    #[test]
    fn ut_read_binary_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.bin");
        let bytes = vec![0u8, 0xff, 0xfe, b'\n', 0x80];
        std::fs::write(&path, &bytes).unwrap();
        let mut out = Vec::new();
        cmd(Operation::Read, path.clone()).run(&plain(), &mut out).unwrap();
        assert_eq!(out, bytes);

        let mut pw = cmd(Operation::Read, path);
        pw.encoding = Some(Encoding::Latin1);
        assert_eq!(run(&pw).unwrap(), "\u{0}\u{ff}\u{fe}\n\u{80}");
    }

    #[test]
    fn ut_verbose_messages_go_to_output() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("f.txt");
        std::fs::write(&src, "x").unwrap();
        let mut copy = cmd(Operation::Copy, src.clone());
        copy.verbose = true;
        copy.to = Some(dir.path().join("g.txt"));
        let shown = run(&copy).unwrap();
        assert!(shown.starts_with("info: copied "));
        assert!(shown.trim_end().ends_with("g.txt"));

        let mut mv = cmd(Operation::Move, src);
        mv.verbose = true;
        mv.to = Some(dir.path().join("h.txt"));
        let shown = run(&mv).unwrap();
        assert!(shown.starts_with("info: moved to "));
        assert!(shown.trim_end().ends_with("h.txt"));
    }

    #[test]
    fn ut_write_requires_data() {
        let dir = TempDir::new().unwrap();
        let r = run(&cmd(Operation::Write, dir.path().join("x")));
        assert!(matches!(r, Err(Error::OperandMissing(_, "data"))));
    }

    #[test]
    fn ut_read_missing_err() {
        let dir = TempDir::new().unwrap();
        let r = run(&cmd(Operation::Read, dir.path().join("x")));
        assert!(matches!(r, Err(Error::PathMissing(_))));
    }

    #[test]
    fn ut_info_and_tree() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("d")).unwrap();
        std::fs::write(dir.path().join("d/f.rs"), "").unwrap();
        let info = run(&cmd(Operation::Info, dir.path().join("d/f.rs"))).unwrap();
        assert!(info.contains("kind: file"));
        assert!(info.contains("extension: .rs"));
        let tree = run(&cmd(Operation::Tree, dir.path().to_path_buf())).unwrap();
        assert_eq!(tree.lines().count(), 1);
        assert!(tree.trim_end().ends_with("f.rs"));
        let r = run(&cmd(Operation::Tree, dir.path().join("d/f.rs")));
        assert!(matches!(r, Err(Error::NotADirectory(_))));
    }

    #[test]
    fn ut_mkdir_copy_move() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a/b");
        run(&cmd(Operation::Mkdir, src.clone())).unwrap();
        assert_eq!(src.is_dir(), true);
        std::fs::write(src.join("f"), "data").unwrap();

        let mut copy = cmd(Operation::Copy, src.clone());
        assert!(matches!(run(&copy), Err(Error::OperandMissing(_, "to"))));
        copy.to = Some(dir.path().join("c"));
        run(&copy).unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("c/f")).unwrap(), "data");

        let mut mv = cmd(Operation::Move, src.clone());
        mv.to = Some(dir.path().join("m"));
        run(&mv).unwrap();
        assert_eq!(src.exists(), false);
        assert_eq!(dir.path().join("m/f").is_file(), true);
    }
}
