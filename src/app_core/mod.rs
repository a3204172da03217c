//! Screen core: state, input types, reducer and the pieces they are built from.

pub mod favorites;
pub mod form;
pub mod gesture;
pub mod input;
pub mod reducer;
pub mod state;
pub mod text_input;
