pub mod init;
pub mod replay;
pub mod root;
