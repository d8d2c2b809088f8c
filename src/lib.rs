pub mod core;
pub mod graph;
pub mod permissions;
pub mod policy;
pub mod session;

// Interactive amendment session
pub mod amend;

// Terminal front end
pub mod cli;
pub mod logging;
