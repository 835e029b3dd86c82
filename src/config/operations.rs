mod io;

pub use io::load_cover_config;
