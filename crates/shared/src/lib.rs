pub mod assets;
pub mod error;
pub mod redirect;
pub mod view;
