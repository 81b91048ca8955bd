mod lyric;

pub use lyric::Lyric;
