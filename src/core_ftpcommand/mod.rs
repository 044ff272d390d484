// Here's the list of the FTP commands implemented
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod handlers;
pub mod list;
pub mod mkd;
pub mod noop;
pub mod pass;
pub mod pwd;
pub mod retr;
pub mod rmd;
pub mod rnfr;
pub mod rnto;
pub mod stor;
pub mod stru;
pub mod type_;
pub mod user;

// The parser and common helpers live here
pub mod ftpcommand;
pub mod utils;
