mod find_repository_root;

pub use find_repository_root::find_repository_root;
