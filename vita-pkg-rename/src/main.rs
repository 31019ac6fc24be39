mod cli;

use clap::Parser;
use cli::Cli;
use snafu::{ResultExt, Snafu, ensure};
use std::path::{Path, PathBuf};
use vita_pkg_rename::{ConsoleProgress, PkgRenamer, RenameOutcome, SilentProgress};

/// Top-level application errors for vita-pkg-rename.
#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to rename PKG"))]
    Rename {
        source: vita_pkg_rename::RenameError,
    },

    #[snafu(display("{failed} of {total} PKG files in '{}' could not be renamed", dir.display()))]
    Batch {
        dir: PathBuf,
        failed: usize,
        total: usize,
    },
}

type Result<T, E = Error> = std::result::Result<T, E>;

#[snafu::report]
fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    if cli.path.is_dir() {
        cmd_rename_dir(&cli.path, cli.dry_run, cli.quiet)
    } else {
        cmd_rename_file(&cli.path, cli.dry_run)
    }
}

fn cmd_rename_file(path: &Path, dry_run: bool) -> Result<()> {
    let renamer = PkgRenamer::new(SilentProgress, dry_run);

    match renamer.rename_file(path).context(RenameSnafu)? {
        RenameOutcome::Planned { to } => println!("{} -> {}", path.display(), to.display()),
        RenameOutcome::Unchanged if dry_run => println!("{} (unchanged)", path.display()),
        RenameOutcome::Renamed { .. } | RenameOutcome::Unchanged => {}
    }

    Ok(())
}

fn cmd_rename_dir(dir: &Path, dry_run: bool, quiet: bool) -> Result<()> {
    let summary = if quiet {
        let renamer = PkgRenamer::new(SilentProgress, dry_run);
        renamer.rename_dir(dir).context(RenameSnafu)?
    } else {
        let renamer = PkgRenamer::new(ConsoleProgress::new(), dry_run);
        renamer.rename_dir(dir).context(RenameSnafu)?
    };

    let total = summary.renamed + summary.unchanged + summary.failed.len();
    ensure!(
        summary.is_success(),
        BatchSnafu {
            dir,
            failed: summary.failed.len(),
            total
        }
    );

    Ok(())
}
