pub mod engine;
pub mod psocr;
pub mod setup;

pub use engine::{line_texts, recognize_file};
pub use psocr::recognise_game;
pub use setup::{find_tesseract, TesseractPaths};
