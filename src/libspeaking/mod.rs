pub mod content;
pub mod error;
pub mod markup;
pub mod store;
pub mod table;
pub mod validate;
pub mod vocabulary;
