pub mod classification;
pub mod company;
pub mod profile;
