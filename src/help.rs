pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const SHORT_HELP: &str = "\
Pathwrap inspects and moves filesystem paths.

Usage:
    pw [options] <op> <path>

Arguments:
    <op>            operation to perform (info, read, tree, mkdir, copy, move, write)
    <path>          filesystem path to operate on

Options:
    --to <path>     destination for copy and move
    --data <text>   contents for write
    --abs           list directory entries as absolute paths
    --encoding <name>  decode files read as text (utf8, latin1); raw bytes otherwise
    --parent        create only the parent directory with mkdir
    --verbose       use verbose output
    --version       print version information and exit
    --help, -h      print this help information and exit

Use 'pw --help --verbose' for more information about pathwrap.
";

pub const LONG_HELP: &str = "\
Pathwrap inspects and moves filesystem paths.

Operations:
    info            show the display path, kind, extension and parent directory
    read            print a file's text or a directory's immediate entries
    tree            print every file beneath a directory
    mkdir           create the path (or only its parent with --parent)
    copy            copy a file or a directory tree to --to
    move            copy to --to and then remove the source
    write           write --data to the path, replacing what was there

Configuration:
    Display settings are read from ~/.pathwrap/config.toml:

        [display]
        max-dir-len = 80
        color = true

Environment:
    RUST_LOG        overrides the log filter (default: warn, or debug with --verbose)
";
