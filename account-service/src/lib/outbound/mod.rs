pub mod directory;
pub mod mail;
pub mod sessions;
