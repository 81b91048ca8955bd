mod link_dto;

pub use link_dto::{CreateLinkDto, UpdateLinkDto};
