pub mod process;
pub mod tmux;
