mod lyric_service;

pub use lyric_service::LyricService;
