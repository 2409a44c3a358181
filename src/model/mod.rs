pub mod advice;
pub mod game_state;
pub mod host_state;
