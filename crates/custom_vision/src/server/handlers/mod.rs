pub mod image;
pub mod status;
pub mod url;
