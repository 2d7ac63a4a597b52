use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bfs_fuse::BFSDISK;

#[derive(Parser)]
pub struct Cli {
    /// Disk image path
    #[arg(long, short, default_value = BFSDISK)]
    pub disk: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the disk image, discarding any previous contents
    Format,

    /// List files with their sizes
    Ls,

    /// Copy a host file into the image, overwriting a file of the same name
    Put {
        /// Host file to copy
        source: PathBuf,

        /// Name inside the image, defaults to the host file name
        #[arg(long, short)]
        name: Option<String>,
    },

    /// Print a file's bytes to stdout
    Cat {
        name: String,

        /// Seek offset applied before reading
        #[arg(long, short, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,

        /// set | cur | end, or the raw value 0 | 1 | 2
        #[arg(long, short, default_value = "set")]
        whence: String,

        /// Bytes to read, defaults to the rest of the file
        #[arg(long, short)]
        count: Option<usize>,
    },

    /// Write text into an existing file at a seek position
    Write {
        name: String,

        text: String,

        /// Seek offset applied before writing
        #[arg(long, short, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,

        /// set | cur | end, or the raw value 0 | 1 | 2
        #[arg(long, short, default_value = "set")]
        whence: String,
    },
}
