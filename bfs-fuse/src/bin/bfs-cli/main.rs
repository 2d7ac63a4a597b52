mod cli;

use std::fs;
use std::io::{self, Write};
use std::process;

use bfs::{Error, Whence};
use clap::Parser;
use cli::{Cli, Command};

/// 命令失败的原因：文件系统错误，或宿主机上的 I/O 错误
enum Failure {
    Fs(Error),
    Io(io::Error),
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Self::Fs(err)
    }
}

impl From<io::Error> for Failure {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => {}
        Err(Failure::Fs(err)) if err.is_fatal() => {
            log::error!("fatal: {err}");
            eprintln!("bfs: {err}");
            process::exit(err.code());
        }
        Err(Failure::Fs(err)) => {
            eprintln!("bfs: {err}");
            process::exit(err.code());
        }
        Err(Failure::Io(err)) => {
            eprintln!("bfs: {err}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<(), Failure> {
    let disk = cli.disk;

    match cli.command {
        Command::Format => {
            bfs_fuse::format(&disk)?;
            println!("formatted {disk:?}");
        }
        Command::Ls => {
            let mut fs = bfs_fuse::mount(&disk)?;
            for file in fs.list() {
                println!("{:>3} {:>8} {}", file.inum, file.size, file.name);
            }
        }
        Command::Put { source, name } => {
            let name = match name {
                Some(name) => name,
                None => source
                    .file_name()
                    .and_then(|name| name.to_str())
                    .ok_or(Error::NotFound)?
                    .to_owned(),
            };
            let data = fs::read(&source)?;

            let mut fs = bfs_fuse::mount(&disk)?;
            let fd = fs.create(&name)?;
            let written = fs.write(fd, &data)?;
            fs.close(fd)?;
            log::info!("put {source:?} -> {name:?}: {written} bytes");
        }
        Command::Cat {
            name,
            offset,
            whence,
            count,
        } => {
            let whence = Whence::try_from(bfs_fuse::raw_whence(&whence))?;
            let mut fs = bfs_fuse::mount(&disk)?;
            let fd = fs.open(&name)?;
            fs.seek(fd, offset, whence)?;

            let count = match count {
                Some(count) => count,
                None => fs.size(fd)?.saturating_sub(fs.tell(fd)?),
            };
            let mut buf = vec![0; count];
            let read = fs.read(fd, &mut buf)?;
            fs.close(fd)?;

            io::stdout().write_all(&buf[..read])?;
        }
        Command::Write {
            name,
            text,
            offset,
            whence,
        } => {
            let whence = Whence::try_from(bfs_fuse::raw_whence(&whence))?;
            let mut fs = bfs_fuse::mount(&disk)?;
            let fd = fs.open(&name)?;
            fs.seek(fd, offset, whence)?;
            let written = fs.write(fd, text.as_bytes())?;
            log::info!("write {name:?}: {written} bytes, size {}", fs.size(fd)?);
            fs.close(fd)?;
        }
    }

    Ok(())
}
