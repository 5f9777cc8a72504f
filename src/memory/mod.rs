pub mod archive;
pub mod cipher;
pub mod index;
pub mod keyfile;
pub mod record;

pub use archive::{archive, parse_import, read_import, recall, Archived, ImportSource, Recalled};
pub use cipher::{generate_key, MemoryCipher};
pub use index::{MemoryIndex, SupabaseIndex};
pub use record::{LookupKey, MemoryRow};
pub use keyfile::{generate_key_file, GeneratedKey, DEFAULT_KEY_FILE};
