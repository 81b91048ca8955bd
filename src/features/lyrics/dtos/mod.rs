mod lyric_dto;

pub use lyric_dto::{CreateLyricDto, UpdateLyricDto};
