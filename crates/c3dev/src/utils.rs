pub mod debug;
pub mod mem_reader;
