// The interface commands a user can type at the prompt
pub mod cd;
pub mod cdup;
pub mod connect;
pub mod get;
pub mod help;
pub mod login;
pub mod ls;
pub mod passive;
pub mod pwd;
pub mod quit;
pub mod serverhelp;

// The command and response vocabulary plus the dispatch tables
pub mod ftpcommand;
pub mod handlers;
pub mod interface;
pub mod protocol;
