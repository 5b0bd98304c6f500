pub mod exports;
pub mod reference;
pub mod registers;
pub mod resources;
