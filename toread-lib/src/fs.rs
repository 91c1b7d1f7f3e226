use std::{
    fs::create_dir_all,
    io::{self, ErrorKind},
    path::PathBuf,
};

use xdg::BaseDirectories;

/// Returns the path to the configuration directory. If it doesn't exist when this function is
/// called, it will be created.
pub fn config_dir() -> io::Result<PathBuf> {
    let path = xdg_prefix().get_config_home().ok_or_else(home_missing)?;

    create_dir_all(&path)?;

    Ok(path)
}

/// Returns the path to the state directory, where the database lives. If it doesn't exist when
/// this function is called, it will be created.
pub fn state_dir() -> io::Result<PathBuf> {
    let path = xdg_prefix().get_state_home().ok_or_else(home_missing)?;

    create_dir_all(&path)?;

    Ok(path)
}

fn xdg_prefix() -> BaseDirectories {
    BaseDirectories::with_prefix("toread")
}

fn home_missing() -> io::Error {
    io::Error::new(ErrorKind::NotFound, "$HOME must exist")
}
