pub mod diagram;
pub mod machine;
pub mod response;
pub mod state;
pub mod worker;
