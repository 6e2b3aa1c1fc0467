use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    /// The root music folder passed on the command line is absent.
    MissingFolder(PathBuf),
    /// A file vanished between enumeration and tag loading.
    MissingFile(PathBuf),
    /// Tag read/write failure reported by the tag backend.
    Tag(String),
    /// A folder path has too few segments to carry an artist name.
    ShallowFolder(PathBuf),
    /// An underscore folder name did not split into exactly Last_First.
    MalformedArtistFolder(PathBuf),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(err) => write!(f, "IO error: {}", err),
            Error::MissingFolder(path) => {
                write!(f, "Music folder not found: {}", path.display())
            }
            Error::MissingFile(path) => {
                write!(f, "File no longer exists: {}", path.display())
            }
            Error::Tag(msg) => write!(f, "Tag error: {}", msg),
            Error::ShallowFolder(path) => write!(
                f,
                "Folder {} is too shallow to derive an artist name",
                path.display()
            ),
            Error::MalformedArtistFolder(path) => write!(
                f,
                "Folder {} does not follow the Last_First naming convention",
                path.display()
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
