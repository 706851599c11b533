pub mod directory;
pub mod http_directory;
pub mod memory_directory;

pub use directory::{Ack, DirectoryClient};
pub use http_directory::HttpDirectoryClient;
pub use memory_directory::InMemoryDirectory;
