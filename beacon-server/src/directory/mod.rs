mod identity_directory;

pub use identity_directory::*;
